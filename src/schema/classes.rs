//! Unit classes and value classes, which govern what may follow a value
//! taking (`#`) node.

use serde::Deserialize;

const SI_SYMBOL_PREFIXES: &[&str] = &[
    "Y", "Z", "E", "P", "T", "G", "M", "k", "h", "da", "d", "c", "m", "u", "n", "p", "f", "a",
    "z", "y",
];

const SI_NAME_PREFIXES: &[&str] = &[
    "yotta", "zetta", "exa", "peta", "tera", "giga", "mega", "kilo", "hecto", "deca", "deci",
    "centi", "milli", "micro", "nano", "pico", "femto", "atto", "zepto", "yocto",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub name: String,
    #[serde(default, rename = "SIUnit")]
    pub si_unit: bool,
    #[serde(default)]
    pub unit_symbol: bool,
    /// Written before the value rather than after it, eg "$".
    #[serde(default)]
    pub unit_prefix: bool,
}

impl Unit {
    /// Whether the text names this unit. Symbols are case sensitive and take
    /// symbol prefixes ("ms"); named units are not, take name prefixes
    /// ("milliseconds"), and may be plural.
    pub fn matches(&self, text: &str) -> bool {
        if self.unit_symbol {
            if text == self.name {
                return true;
            }
            return self.si_unit
                && SI_SYMBOL_PREFIXES
                    .iter()
                    .any(|prefix| text.strip_prefix(prefix) == Some(self.name.as_str()));
        }

        let name = self
            .name
            .to_lowercase();
        let text = text.to_lowercase();
        let mut candidates = vec![text.as_str()];
        if let Some(singular) = text.strip_suffix('s') {
            candidates.push(singular);
        }

        candidates
            .into_iter()
            .any(|candidate| {
                candidate == name
                    || (self.si_unit
                        && SI_NAME_PREFIXES
                            .iter()
                            .any(|prefix| candidate.strip_prefix(prefix) == Some(name.as_str())))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitClass {
    pub name: String,
    #[serde(default)]
    pub default_units: Option<String>,
    pub units: Vec<Unit>,
}

impl UnitClass {
    pub fn find(&self, text: &str) -> Option<&Unit> {
        self.units
            .iter()
            .find(|unit| unit.matches(text))
    }

    pub fn unit_names(&self) -> Vec<&str> {
        self.units
            .iter()
            .map(|unit| unit.name.as_str())
            .collect()
    }

    /// Separate a value from a unit of this class, returning the bare value.
    /// Prefix units are written against the value ("$3"), others follow it
    /// after a space ("3 ms").
    pub fn strip_units<'v>(&self, value: &'v str) -> Option<&'v str> {
        for unit in &self.units {
            if unit.unit_prefix {
                if let Some(rest) = value.strip_prefix(unit.name.as_str()) {
                    return Some(rest.trim_start());
                }
            }
        }
        let (number, unit) = value.rsplit_once(char::is_whitespace)?;
        let unit = self.find(unit)?;
        if unit.unit_prefix {
            return None;
        }
        Some(number.trim_end())
    }
}

/// Kinds of value a `#` node accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ValueClass {
    #[serde(rename = "numericClass")]
    Numeric,
    #[serde(rename = "textClass")]
    Text,
    #[serde(rename = "nameClass")]
    Name,
    #[serde(rename = "dateTimeClass")]
    DateTime,
    #[serde(rename = "posixPath")]
    PosixPath,
}

impl ValueClass {
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ValueClass::Numeric => {
                regex!(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").is_match(value)
            }
            ValueClass::Text => {
                !value.is_empty()
                    && !value
                        .chars()
                        .any(|c| c.is_control())
            }
            ValueClass::Name => regex!(r"^[A-Za-z0-9_\-]+$").is_match(value),
            ValueClass::DateTime => {
                regex!(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?$")
                    .is_match(value)
            }
            ValueClass::PosixPath => regex!(r"^[A-Za-z0-9_\-./~]+$").is_match(value),
        }
    }
}
