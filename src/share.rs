//! Settings serialization: plain JSON for persistent storage and
//! base64-wrapped JSON for copy-pasteable share codes. Decoding never
//! panics; callers fall back to the last-known-good settings on error.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::settings::SimulationSettings;

pub fn encode_json(settings: &SimulationSettings) -> Result<String, String> {
    serde_json::to_string(settings).map_err(|err| format!("Failed to encode settings: {err}"))
}

pub fn decode_json(blob: &str) -> Result<SimulationSettings, String> {
    let settings: SimulationSettings =
        serde_json::from_str(blob).map_err(|err| format!("Invalid settings JSON: {err}"))?;
    Ok(settings.sanitized())
}

pub fn encode_share_code(settings: &SimulationSettings) -> Result<String, String> {
    Ok(STANDARD.encode(encode_json(settings)?))
}

pub fn decode_share_code(code: &str) -> Result<SimulationSettings, String> {
    let bytes = STANDARD
        .decode(code.trim())
        .map_err(|err| format!("Invalid base64 in share code: {err}"))?;
    let json =
        String::from_utf8(bytes).map_err(|err| format!("Share code is not UTF-8: {err}"))?;
    decode_json(&json)
}
