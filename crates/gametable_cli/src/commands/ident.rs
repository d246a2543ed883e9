//! Ident command implementation.

use gametable_codec::{is_valid_byte, Identifier};

/// Runs the ident command.
pub fn run(value: &str, force_chars: bool) -> Result<(), Box<dyn std::error::Error>> {
    let id = parse_identifier(value, force_chars)?;

    println!("Identifier: {:?}", id.to_string());
    println!("  value: {} (0x{:08x})", id.value(), id.value());
    println!("  bytes: {}", describe_bytes(id));
    println!("  chars: {}", describe_chars(id));
    if !id.is_printable() {
        println!("  (some bytes have no character projection)");
    }

    Ok(())
}

/// Parses `0x` hex, a decimal number, or up to four characters.
///
/// With `force_chars` the value is always parsed as characters.
pub fn parse_identifier(value: &str, force_chars: bool) -> Result<Identifier, Box<dyn std::error::Error>> {
    if !force_chars {
        if let Some(hex) = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
        {
            return Ok(Identifier::from_int(u32::from_str_radix(hex, 16)?));
        }
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(Identifier::from_int(value.parse()?));
        }
    }
    Ok(value.parse::<Identifier>()?)
}

/// `b0..b3` as hex, least significant first.
pub fn describe_bytes(id: Identifier) -> String {
    id.to_bytes()
        .iter()
        .enumerate()
        .map(|(i, b)| format!("b{i}=0x{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `c0..c3`, with `-` for bytes outside the character range.
pub fn describe_chars(id: Identifier) -> String {
    id.to_bytes()
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            if is_valid_byte(b) {
                format!("c{i}={:?}", id.char(i))
            } else {
                format!("c{i}=-")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_forms() {
        let expected = Identifier::from_chars('A', 'B', 'C', 'D');
        assert_eq!(parse_identifier("0x44434241", false).unwrap(), expected);
        assert_eq!(parse_identifier("1145258561", false).unwrap(), expected);
        assert_eq!(parse_identifier("DCBA", false).unwrap(), expected);
    }

    #[test]
    fn forced_chars() {
        let id = parse_identifier("1234", true).unwrap();
        assert_eq!(id.to_string(), "1234");
        assert_eq!(id.b0(), b'4');
        assert_eq!(parse_identifier("1234", false).unwrap().value(), 1234);
    }

    #[test]
    fn parse_errors() {
        assert!(parse_identifier("0xZZ", false).is_err());
        assert!(parse_identifier("99999999999", false).is_err());
        assert!(parse_identifier("TOOLONG", false).is_err());
    }

    #[test]
    fn describe_views() {
        let mut id = Identifier::from_chars('A', 'B', 'C', 'D');
        id.set_b3(0x7F);
        assert_eq!(describe_bytes(id), "b0=0x41 b1=0x42 b2=0x43 b3=0x7f");
        assert_eq!(describe_chars(id), "c0='A' c1='B' c2='C' c3=-");
    }

    #[test]
    fn run_accepts_valid_input() {
        run("0x00000000", false).unwrap();
        assert!(run("", false).is_ok());
    }
}
