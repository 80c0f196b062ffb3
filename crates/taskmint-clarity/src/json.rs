//! JSON rendering of Clarity values in the `{ "type", "value" }` shape used
//! by Stacks explorers and client libraries.

use crate::ClarityValue;
use serde_json::{json, Map, Value};

impl ClarityValue {
    /// Type signature as Clarity would print it, with lengths taken from the
    /// value itself.
    pub fn type_signature(&self) -> String {
        match self {
            Self::Int(_) => "int".to_string(),
            Self::UInt(_) => "uint".to_string(),
            Self::Bool(_) => "bool".to_string(),
            Self::Buffer(b) => format!("(buff {})", b.len()),
            Self::StringAscii(s) => format!("(string-ascii {})", s.len()),
            Self::StringUtf8(s) => format!("(string-utf8 {})", s.len()),
            Self::Principal(_) => "principal".to_string(),
            Self::OptionalNone => "(optional UnknownType)".to_string(),
            Self::OptionalSome(inner) => format!("(optional {})", inner.type_signature()),
            Self::ResponseOk(inner) => format!("(response {} UnknownType)", inner.type_signature()),
            Self::ResponseErr(inner) => format!("(response UnknownType {})", inner.type_signature()),
            Self::List(items) => match items.first() {
                Some(first) => format!("(list {} {})", items.len(), first.type_signature()),
                None => "(list 0 UnknownType)".to_string(),
            },
            Self::Tuple(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(name, v)| format!("({} {})", name, v.type_signature()))
                    .collect();
                format!("(tuple {})", parts.join(" "))
            }
        }
    }

    pub fn to_json(&self) -> Value {
        let value = match self {
            // 128-bit integers do not fit a JSON number
            Self::Int(v) => json!(v.to_string()),
            Self::UInt(v) => json!(v.to_string()),
            Self::Bool(b) => json!(b),
            Self::Buffer(b) => json!(format!("0x{}", hex::encode(b))),
            Self::StringAscii(s) | Self::StringUtf8(s) => json!(s),
            Self::Principal(p) => json!(p.to_address()),
            Self::OptionalNone => Value::Null,
            Self::OptionalSome(inner) => inner.to_json(),
            Self::ResponseOk(inner) | Self::ResponseErr(inner) => {
                return json!({
                    "type": self.type_signature(),
                    "value": inner.to_json(),
                    "success": matches!(self, Self::ResponseOk(_)),
                });
            }
            Self::List(items) => Value::Array(items.iter().map(ClarityValue::to_json).collect()),
            Self::Tuple(fields) => {
                let mut map = Map::new();
                for (name, field) in fields {
                    map.insert(name.clone(), field.to_json());
                }
                Value::Object(map)
            }
        };
        json!({ "type": self.type_signature(), "value": value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint_as_string() {
        assert_eq!(
            ClarityValue::uint(1_500_000u32).to_json(),
            json!({ "type": "uint", "value": "1500000" })
        );
    }

    #[test]
    fn test_nested() {
        let value = ClarityValue::some(ClarityValue::tuple([
            ("description", ClarityValue::string_utf8("fix it")),
            ("status", ClarityValue::uint(0u8)),
        ]));
        let rendered = value.to_json();
        assert_eq!(
            rendered["type"],
            "(optional (tuple (description (string-utf8 6)) (status uint)))"
        );
        assert_eq!(rendered["value"]["value"]["status"]["value"], "0");
        assert_eq!(rendered["value"]["value"]["description"]["value"], "fix it");
    }

    #[test]
    fn test_response() {
        let rendered = ClarityValue::ok(ClarityValue::Bool(true)).to_json();
        assert_eq!(rendered["success"], true);
        assert_eq!(rendered["type"], "(response bool UnknownType)");
        assert_eq!(ClarityValue::OptionalNone.to_json()["value"], Value::Null);
    }
}
