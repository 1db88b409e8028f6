use crate::error::{Result, TagError};
use crate::value::Value;

const CARDINALS: [&str; 11] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

const ORDINALS: [&str; 9] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
];

const ORDINAL_SUFFIXES: [&str; 10] = ["th", "st", "nd", "rd", "th", "th", "th", "th", "th", "th"];

/// Naming and wording helpers for tag definitions and tag output
pub struct TextUtils;

impl TextUtils {
    /// Derive a tag name from a type name: `KeywordNoDefaultTag` becomes
    /// `keyword_no_default`.
    ///
    /// An underscore goes before each capital that follows a lowercase
    /// letter or starts a new word (`HTMLParser` becomes `html_parser`);
    /// a trailing `_tag` is dropped.
    pub fn tag_name_from_type(type_name: &str) -> String {
        let chars: Vec<char> = type_name.chars().collect();
        let mut name = String::with_capacity(type_name.len() + 4);
        for (i, &c) in chars.iter().enumerate() {
            if c.is_ascii_uppercase() {
                let after_lower = i > 0 && chars[i - 1].is_ascii_lowercase();
                let starts_word = chars.get(i + 1).map_or(false, |next| !next.is_ascii_uppercase());
                if after_lower || starts_word {
                    name.push('_');
                }
            }
            name.push(c);
        }
        let name = name.to_lowercase();
        let name = name.trim_matches('_');
        name.strip_suffix("_tag").unwrap_or(name).to_string()
    }

    /// Words for zero through ten, digits above
    pub fn cardinal(n: u64) -> String {
        usize::try_from(n)
            .ok()
            .and_then(|i| CARDINALS.get(i))
            .map(|word| word.to_string())
            .unwrap_or_else(|| n.to_string())
    }

    /// Words for first through ninth, suffixed digits above (`11th`, `22nd`)
    pub fn ordinal(n: u64) -> Result<String> {
        if n < 1 {
            return Err(TagError::validation("n", &Value::Integer(n as i64), "must be >= 1"));
        }
        if let Some(word) = usize::try_from(n - 1).ok().and_then(|i| ORDINALS.get(i)) {
            return Ok(word.to_string());
        }
        let suffix = if (11..=13).contains(&(n % 100)) {
            ORDINAL_SUFFIXES[0]
        } else {
            ORDINAL_SUFFIXES[(n % 10) as usize]
        };
        Ok(format!("{}{}", n, suffix))
    }

    pub fn pluralize(singular: &str, quantity: u64, suffix: &str) -> String {
        if quantity == 1 {
            singular.to_string()
        } else {
            format!("{}{}", singular, suffix)
        }
    }

    /// `verbose_quantity("link", 3, "s") == "three links"`
    pub fn verbose_quantity(singular: &str, quantity: u64, suffix: &str) -> String {
        format!(
            "{} {}",
            Self::cardinal(quantity),
            Self::pluralize(singular, quantity, suffix)
        )
    }

    /// Quantity carried by a cleaned value: a non-negative integer, an
    /// integer string, or the length of a list
    pub fn quantity_of(value: &Value) -> Result<u64> {
        let quantity = match value {
            Value::Integer(i) => Some(*i),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            Value::List(items) => Some(items.len() as i64),
            _ => None,
        };
        quantity
            .and_then(|q| u64::try_from(q).ok())
            .ok_or_else(|| TagError::validation("quantity", value, "must be an integer or sequence"))
    }
}
