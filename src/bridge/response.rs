// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Parsing of the bridge's read answer

use super::BridgeError;

const VALUE_MARKER: &str = "value";

/// Extract the register value from the bridge's answer.
///
/// The value is the number following the last `value` marker of the body.
/// Whitespace, one `:` or `=` separator and a quote may sit between the two,
/// nothing but whitespace or a closing quote may follow the number.
///
/// ```
/// use shine_probe::bridge::parse_register_value;
///
/// assert_eq!(parse_register_value("Read value 123").unwrap(), 123);
/// assert!(parse_register_value("value unavailable").is_err());
/// assert_eq!(parse_register_value("value=990\n").unwrap(), 990);
/// ```
pub fn parse_register_value(body: &str) -> Result<u16, BridgeError> {
    let Some(pos) = body.rfind(VALUE_MARKER) else {
        return Err(BridgeError::MissingValue {
            body: body.to_string(),
        });
    };

    let tail = &body[pos + VALUE_MARKER.len()..];
    let invalid = || BridgeError::InvalidValue {
        raw: tail.trim().to_string(),
    };

    let rest = tail.trim_start();
    let rest = rest
        .strip_prefix(':')
        .or_else(|| rest.strip_prefix('='))
        .unwrap_or(rest)
        .trim_start();
    let rest = rest.strip_prefix('"').unwrap_or(rest);

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(invalid());
    }
    let (digits, trailer) = rest.split_at(digits_len);

    let trailer = trailer.trim();
    if !(trailer.is_empty() || trailer == "\"") {
        return Err(invalid());
    }

    digits.parse::<u16>().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_answer() {
        assert_eq!(parse_register_value("...value 123").unwrap(), 123);
        assert_eq!(parse_register_value("value 0").unwrap(), 0);
        assert_eq!(parse_register_value("value 65535\r\n").unwrap(), 65535);
    }

    #[test]
    fn test_separators() {
        assert_eq!(parse_register_value("value: 2048").unwrap(), 2048);
        assert_eq!(parse_register_value("value=2560").unwrap(), 2560);
        assert_eq!(parse_register_value("value \"99\"").unwrap(), 99);
    }

    #[test]
    fn test_last_marker_wins() {
        let body = "register value requested, read value 990";
        assert_eq!(parse_register_value(body).unwrap(), 990);
    }

    #[test]
    fn test_missing_marker() {
        assert!(matches!(
            parse_register_value("Modbus read error"),
            Err(BridgeError::MissingValue { .. })
        ));
        assert!(matches!(
            parse_register_value(""),
            Err(BridgeError::MissingValue { .. })
        ));
    }

    #[test]
    fn test_marker_without_number() {
        for body in [
            "value",
            "value abc",
            "value -1",
            "value 70000",
            "value 12 volts",
            "no value available",
        ] {
            assert!(
                matches!(
                    parse_register_value(body),
                    Err(BridgeError::InvalidValue { .. })
                ),
                "{body:?} should not parse"
            );
        }
    }
}
