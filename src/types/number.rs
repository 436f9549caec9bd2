//! Oracle NUMBER encoding and decoding
//!
//! Oracle NUMBER is stored in a variable-length format:
//! - First byte: exponent (with sign encoding)
//! - Subsequent bytes: mantissa digits in base-100
//!
//! For positive numbers: exponent byte has high bit set, mantissa bytes are value + 1
//! For negative numbers: exponent byte is inverted, mantissa bytes are 101 - value,
//!                       and a trailing 102 byte is added (if not at max digits)
//!
//! Every SDO_GEOMETRY attribute and collection element is a NUMBER, so this is
//! where all native conversions (and conversion failures) happen.

use bytes::Bytes;

use crate::error::{Error, Result};

/// Maximum number of digits in an Oracle NUMBER
const MAX_DIGITS: usize = 40;

/// Maximum characters in a number string representation
const MAX_STRING_CHARS: usize = 172;

/// Maximum mantissa bytes; negative numbers using all of them carry no terminator
const MAX_MANTISSA_BYTES: usize = 20;

/// Terminator byte of negative numbers
const NEGATIVE_TERMINATOR: u8 = 102;

/// Field label used before a conversion error is attributed to an attribute
const NUMBER_FIELD: &str = "NUMBER";

/// Decimal text form of a decoded Oracle NUMBER
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalNumber {
    /// String representation of the number
    pub value: String,
    /// Whether the number is an integer (no decimal point)
    pub is_integer: bool,
    /// Whether this is the maximum negative value (-1e126)
    pub is_max_negative: bool,
}

impl DecimalNumber {
    fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let is_integer = !value.contains('.');
        Self {
            value,
            is_integer,
            is_max_negative: false,
        }
    }
}

/// An Oracle NUMBER held in its wire representation
///
/// This is the value slot of every numeric SDO_GEOMETRY field. Conversions to
/// native types decode the wire bytes on demand and fail with
/// [`Error::Conversion`] when the value does not fit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OracleNumber {
    bytes: Bytes,
}

impl OracleNumber {
    /// Wrap wire bytes, checking that they decode
    pub fn from_wire(bytes: impl Into<Bytes>) -> Result<Self> {
        let bytes = bytes.into();
        decode_oracle_number(&bytes)?;
        Ok(Self { bytes })
    }

    /// Encode an integer
    pub fn from_i64(value: i64) -> Self {
        if value == 0 {
            return Self {
                bytes: Bytes::from_static(&[128]),
            };
        }

        // Base-100 digit pairs, least significant first
        let mut magnitude = value.unsigned_abs();
        let mut pairs = Vec::with_capacity(10);
        while magnitude > 0 {
            pairs.push((magnitude % 100) as u8);
            magnitude /= 100;
        }
        let exponent_on_wire = 192 + pairs.len() as u8;
        pairs.reverse();
        while pairs.last() == Some(&0) {
            pairs.pop();
        }

        let mut bytes = Vec::with_capacity(pairs.len() + 2);
        if value < 0 {
            bytes.push(!exponent_on_wire);
            bytes.extend(pairs.iter().map(|pair| 101 - pair));
            bytes.push(NEGATIVE_TERMINATOR);
        } else {
            bytes.push(exponent_on_wire);
            bytes.extend(pairs.iter().map(|pair| pair + 1));
        }
        Self {
            bytes: Bytes::from(bytes),
        }
    }

    /// Encode a float
    ///
    /// The shortest decimal text that round-trips the value is encoded, so
    /// [`to_f64`](Self::to_f64) returns exactly `value` again.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::conversion(
                NUMBER_FIELD,
                format!("{} cannot be represented as Oracle NUMBER", value),
            ));
        }
        let bytes = encode_oracle_number(&value.to_string())?;
        Ok(Self {
            bytes: Bytes::from(bytes),
        })
    }

    /// Parse decimal text (e.g. `"-77.1202"`, `"1.5e10"`)
    pub fn from_decimal_str(value: &str) -> Result<Self> {
        let bytes = encode_oracle_number(value)?;
        Ok(Self {
            bytes: Bytes::from(bytes),
        })
    }

    /// Get the wire bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode to decimal text
    pub fn to_decimal(&self) -> Result<DecimalNumber> {
        decode_oracle_number(&self.bytes)
    }

    /// Decode to a decimal string
    pub fn to_decimal_string(&self) -> Result<String> {
        Ok(self.to_decimal()?.value)
    }

    /// Try to convert to i64
    pub fn to_i64(&self) -> Result<i64> {
        let num = self.to_decimal()?;
        if num.is_max_negative {
            return Err(Error::conversion(
                NUMBER_FIELD,
                "Maximum negative Oracle number cannot be represented as i64",
            ));
        }
        if !num.is_integer {
            return Err(Error::conversion(
                NUMBER_FIELD,
                format!("{} is not an integer", num.value),
            ));
        }
        num.value
            .parse()
            .map_err(|e| Error::conversion(NUMBER_FIELD, format!("Cannot parse as i64: {}", e)))
    }

    /// Try to convert to a signed 32-bit integer
    pub fn to_i32(&self) -> Result<i32> {
        let value = self.to_i64()?;
        i32::try_from(value).map_err(|_| {
            Error::conversion(NUMBER_FIELD, format!("{} out of range for i32", value))
        })
    }

    /// Try to convert to an unsigned 32-bit integer
    pub fn to_u32(&self) -> Result<u32> {
        let value = self.to_i64()?;
        u32::try_from(value).map_err(|_| {
            Error::conversion(NUMBER_FIELD, format!("{} out of range for u32", value))
        })
    }

    /// Try to convert to f64
    pub fn to_f64(&self) -> Result<f64> {
        let num = self.to_decimal()?;
        if num.is_max_negative {
            return Ok(-1e126);
        }
        num.value
            .parse()
            .map_err(|e| Error::conversion(NUMBER_FIELD, format!("Cannot parse as f64: {}", e)))
    }
}

impl From<i32> for OracleNumber {
    fn from(value: i32) -> Self {
        Self::from_i64(value as i64)
    }
}

impl From<u32> for OracleNumber {
    fn from(value: u32) -> Self {
        Self::from_i64(value as i64)
    }
}

/// Decode an Oracle NUMBER from wire format bytes
///
/// Oracle NUMBER format:
/// - Byte 0: Exponent byte (with sign encoding)
/// - Bytes 1..n: Mantissa digits in base-100 format
pub fn decode_oracle_number(data: &[u8]) -> Result<DecimalNumber> {
    if data.is_empty() {
        return Err(Error::conversion(
            NUMBER_FIELD,
            "Empty data for Oracle NUMBER",
        ));
    }

    let exponent_byte = data[0];
    let is_positive = (exponent_byte & 0x80) != 0;

    // Decode the exponent
    let exponent = if is_positive {
        (exponent_byte as i16) - 193
    } else {
        (!exponent_byte as i16) - 193
    };

    let mut decimal_point_index = (exponent * 2 + 2) as i32;

    // Special case: single byte means zero (positive) or -1e126 (negative)
    if data.len() == 1 {
        if is_positive {
            return Ok(DecimalNumber::new("0"));
        } else {
            return Ok(DecimalNumber {
                value: String::new(),
                is_integer: false,
                is_max_negative: true,
            });
        }
    }

    let mantissa_len = if !is_positive && data[data.len() - 1] == NEGATIVE_TERMINATOR {
        data.len() - 2
    } else {
        data.len() - 1
    };
    if mantissa_len == 0 {
        return Err(Error::conversion(
            NUMBER_FIELD,
            "Oracle NUMBER has no mantissa digits",
        ));
    }

    let mut digits = Vec::with_capacity(MAX_DIGITS);
    for i in 0..mantissa_len {
        let byte = data[i + 1];
        if byte == 0 || byte > 101 {
            return Err(Error::conversion(
                NUMBER_FIELD,
                format!("Invalid mantissa byte {:#04x}", byte),
            ));
        }
        let value = if is_positive { byte - 1 } else { 101 - byte };

        // First digit of the pair
        let digit1 = value / 10;
        if digit1 == 0 && digits.is_empty() {
            decimal_point_index -= 1;
        } else if digit1 == 10 {
            digits.push(1);
            digits.push(0);
            decimal_point_index += 1;
        } else {
            digits.push(digit1);
        }

        // Second digit of the pair
        let digit2 = value % 10;
        if digit2 != 0 || i < mantissa_len - 1 {
            digits.push(digit2);
        }
    }

    // Remove trailing zeros (for integer detection)
    while digits.last() == Some(&0) {
        if (digits.len() as i32) <= decimal_point_index {
            break;
        }
        digits.pop();
    }

    let mut result = String::with_capacity(MAX_STRING_CHARS);

    if !is_positive {
        result.push('-');
    }

    let is_integer;
    if decimal_point_index <= 0 {
        result.push_str("0.");
        is_integer = false;
        for _ in decimal_point_index..0 {
            result.push('0');
        }
        for d in &digits {
            result.push(char::from(b'0' + d));
        }
    } else {
        is_integer = decimal_point_index as usize >= digits.len();
        for (i, d) in digits.iter().enumerate() {
            if i > 0 && i as i32 == decimal_point_index {
                result.push('.');
            }
            result.push(char::from(b'0' + d));
        }
        // Add trailing zeros for integers
        for _ in digits.len()..decimal_point_index as usize {
            result.push('0');
        }
    }

    if result.is_empty() || result == "-" || result == "0." || result == "-0." {
        return Ok(DecimalNumber::new("0"));
    }

    Ok(DecimalNumber {
        value: result,
        is_integer,
        is_max_negative: false,
    })
}

/// Encode a number string to Oracle NUMBER wire format
pub fn encode_oracle_number(value: &str) -> Result<Vec<u8>> {
    let value = value.trim();

    if value.is_empty() {
        return Err(Error::conversion(
            NUMBER_FIELD,
            "Empty string cannot be encoded as Oracle NUMBER",
        ));
    }

    if value.len() > MAX_STRING_CHARS {
        return Err(Error::conversion(
            NUMBER_FIELD,
            "Number string too long for Oracle NUMBER",
        ));
    }

    let bytes = value.as_bytes();
    let mut pos = 0;

    let is_negative = bytes.first() == Some(&b'-');
    if is_negative {
        pos += 1;
    }

    // Parse digits before decimal point
    let mut digits = Vec::with_capacity(MAX_DIGITS);
    let mut decimal_point_index: i32;

    while pos < bytes.len() {
        let b = bytes[pos];
        if b == b'.' || b == b'e' || b == b'E' {
            break;
        }
        if !b.is_ascii_digit() {
            return Err(invalid_character(b));
        }
        let digit = b - b'0';
        if digit != 0 || !digits.is_empty() {
            digits.push(digit);
        }
        pos += 1;
    }
    decimal_point_index = digits.len() as i32;

    // Parse digits after decimal point
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() {
            let b = bytes[pos];
            if b == b'e' || b == b'E' {
                break;
            }
            if !b.is_ascii_digit() {
                return Err(invalid_character(b));
            }
            let digit = b - b'0';
            if digit == 0 && digits.is_empty() {
                decimal_point_index -= 1;
            } else {
                digits.push(digit);
            }
            pos += 1;
        }
    }

    // Parse exponent
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        pos += 1;
        let exponent: i32 = value[pos..].parse().map_err(|_| {
            Error::conversion(NUMBER_FIELD, format!("Invalid exponent in '{}'", value))
        })?;
        decimal_point_index += exponent;
    }

    while digits.last() == Some(&0) {
        digits.pop();
    }

    // Zero is a special case
    if digits.is_empty() {
        return Ok(vec![128]);
    }

    if digits.len() > MAX_DIGITS || decimal_point_index > 126 || decimal_point_index < -129 {
        return Err(Error::conversion(
            NUMBER_FIELD,
            format!("{} out of range for Oracle NUMBER", value),
        ));
    }

    // An odd exponent puts a single digit in the first base-100 pair
    let prepend_zero = decimal_point_index.rem_euclid(2) == 1;
    if prepend_zero {
        digits.push(0);
        decimal_point_index += 1;
    }

    if digits.len() % 2 == 1 {
        digits.push(0);
    }

    let num_pairs = digits.len() / 2;

    let mut result = Vec::with_capacity(num_pairs + 2);

    let exponent_on_wire = ((decimal_point_index / 2) + 192) as u8;
    result.push(if is_negative {
        !exponent_on_wire
    } else {
        exponent_on_wire
    });

    let mut digit_pos = 0;
    for pair_num in 0..num_pairs {
        let pair_value = if pair_num == 0 && prepend_zero {
            let v = digits[digit_pos];
            digit_pos += 1;
            v
        } else {
            let v = digits[digit_pos] * 10 + digits[digit_pos + 1];
            digit_pos += 2;
            v
        };

        result.push(if is_negative {
            101 - pair_value
        } else {
            pair_value + 1
        });
    }

    if is_negative && num_pairs < MAX_MANTISSA_BYTES {
        result.push(NEGATIVE_TERMINATOR);
    }

    Ok(result)
}

fn invalid_character(b: u8) -> Error {
    Error::conversion(
        NUMBER_FIELD,
        format!("Invalid character '{}' in number", char::from(b)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_zero() {
        let num = decode_oracle_number(&[128]).unwrap();
        assert_eq!(num.value, "0");
        assert!(num.is_integer);
    }

    #[test]
    fn test_decode_positive_integer() {
        // 123 encoded
        let num = decode_oracle_number(&[0xc2, 0x02, 0x18]).unwrap();
        assert_eq!(num.value, "123");
        assert!(num.is_integer);
    }

    #[test]
    fn test_decode_negative_integer() {
        // -123 encoded: ~exponent, 101-digits, 102
        let num = decode_oracle_number(&[0x3d, 0x64, 0x4e, 0x66]).unwrap();
        assert_eq!(num.value, "-123");
    }

    #[test]
    fn test_decode_decimal() {
        // 1.5 encoded: exponent=0, digits=[1,50]
        let num = decode_oracle_number(&[0xc1, 0x02, 0x33]).unwrap();
        assert_eq!(num.value, "1.5");
        assert!(!num.is_integer);
    }

    #[test]
    fn test_decode_rejects_bad_mantissa() {
        let err = decode_oracle_number(&[0xc1, 0xff]).unwrap_err();
        assert!(err.is_conversion_error());
        assert!(decode_oracle_number(&[]).is_err());
    }

    #[test]
    fn test_decode_rejects_terminator_without_mantissa() {
        for exponent in [0x3e, 0x20, 0x7f] {
            let err = decode_oracle_number(&[exponent, NEGATIVE_TERMINATOR]).unwrap_err();
            assert!(err.is_conversion_error(), "exponent {:#04x}", exponent);
        }
        assert!(OracleNumber::from_wire(vec![0x3e, NEGATIVE_TERMINATOR]).is_err());
    }

    #[test]
    fn test_from_i64_matches_text_encoder() {
        for value in [
            0i64,
            1,
            -1,
            7,
            100,
            -100,
            2002,
            -123,
            8307,
            1_000_000,
            -4_020_000,
            i64::from(i32::MAX),
            i64::from(i32::MIN),
            i64::MAX,
            i64::MIN,
        ] {
            let expected = encode_oracle_number(&value.to_string()).unwrap();
            assert_eq!(
                OracleNumber::from_i64(value).as_bytes(),
                &expected[..],
                "encoding of {}",
                value
            );
        }
    }

    #[test]
    fn test_encode_gtype_values() {
        assert_eq!(encode_oracle_number("2002").unwrap(), vec![0xc2, 21, 3]);
        assert_eq!(encode_oracle_number("1003").unwrap(), vec![0xc2, 11, 4]);
        assert_eq!(encode_oracle_number("8307").unwrap(), vec![0xc2, 84, 8]);
    }

    #[test]
    fn test_encode_small_fraction() {
        // 0.05 = 5 * 100^-1: exponent byte 192, single mantissa digit 5
        assert_eq!(encode_oracle_number("0.05").unwrap(), vec![192, 6]);
        assert_eq!(decode_oracle_number(&[192, 6]).unwrap().value, "0.05");

        // 0.005 = 50 * 100^-2
        let encoded = encode_oracle_number("0.005").unwrap();
        assert_eq!(encoded, vec![191, 51]);
        assert_eq!(decode_oracle_number(&encoded).unwrap().value, "0.005");
    }

    #[test]
    fn test_encode_scientific() {
        let encoded = encode_oracle_number("1.5e10").unwrap();
        let decoded = decode_oracle_number(&encoded).unwrap();
        assert_eq!(decoded.value, "15000000000");
    }

    #[test]
    fn test_encode_rejects_garbage() {
        assert!(encode_oracle_number("").is_err());
        assert!(encode_oracle_number("12a").is_err());
        assert!(encode_oracle_number("1e").is_err());
        assert!(encode_oracle_number("1e200").is_err());
    }

    #[test]
    fn test_roundtrip_coordinates() {
        let values = [
            "-77.120201",
            "38.9342",
            "12.5",
            "45",
            "-0.5",
            "100",
            "0.30000000000000004",
        ];
        for val in values {
            let encoded = encode_oracle_number(val).unwrap();
            let decoded = decode_oracle_number(&encoded).unwrap();
            assert_eq!(decoded.value, val, "Roundtrip failed for {}", val);
        }
    }

    #[test]
    fn test_from_f64_exact() {
        for v in [0.1, -77.120201, 1e-20, 123456.789, -0.0, 1e20, 0.1 + 0.2] {
            let num = OracleNumber::from_f64(v).unwrap();
            assert_eq!(num.to_f64().unwrap(), v, "f64 roundtrip failed for {}", v);
        }
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert!(OracleNumber::from_f64(f64::NAN).is_err());
        assert!(OracleNumber::from_f64(f64::INFINITY).is_err());
        assert!(OracleNumber::from_f64(f64::MAX).is_err());
    }

    #[test]
    fn test_integer_conversions() {
        let num = OracleNumber::from(2003);
        assert_eq!(num.to_i32().unwrap(), 2003);
        assert_eq!(num.to_u32().unwrap(), 2003);

        let negative = OracleNumber::from_i64(-5);
        assert_eq!(negative.to_i32().unwrap(), -5);
        assert!(negative.to_u32().unwrap_err().is_conversion_error());

        let big = OracleNumber::from_i64(i64::from(i32::MAX) + 1);
        assert!(big.to_i32().is_err());

        let fraction = OracleNumber::from_f64(2001.5).unwrap();
        assert!(fraction.to_i64().unwrap_err().is_conversion_error());
    }

    #[test]
    fn test_from_wire_validates() {
        assert!(OracleNumber::from_wire(vec![0xc2, 0x02, 0x18]).is_ok());
        assert!(OracleNumber::from_wire(Vec::new()).is_err());
    }

    #[test]
    fn test_max_negative() {
        let num = OracleNumber::from_wire(vec![0x00]).unwrap();
        assert_eq!(num.to_f64().unwrap(), -1e126);
        assert!(num.to_i64().is_err());
    }

    // =========================================================================
    // WIRE-LEVEL FORMAT TESTS
    // =========================================================================

    /// Negative numbers end with terminator byte 0x66 (102) unless all 20
    /// mantissa positions are used; positive numbers never do.
    #[test]
    fn test_wire_number_negative_terminator_0x66() {
        let encoded = encode_oracle_number("-123").unwrap();
        assert_eq!(*encoded.last().unwrap(), 0x66);

        let pos_encoded = encode_oracle_number("123").unwrap();
        assert_ne!(*pos_encoded.last().unwrap(), 0x66);
    }

    /// Exponent byte: positive 0xC1 + exponent, negative inverted, zero 0x80.
    #[test]
    fn test_wire_number_exponent_encoding() {
        assert_eq!(encode_oracle_number("0").unwrap(), vec![0x80]);
        assert_eq!(encode_oracle_number("5").unwrap()[0], 0xC1);
        assert_eq!(encode_oracle_number("123").unwrap()[0], 0xC2);
        assert_eq!(encode_oracle_number("-5").unwrap(), vec![0x3E, 0x60, 0x66]);
    }
}
