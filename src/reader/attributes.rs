//! Typed attribute access with skip-on-error semantics
//!
//! Blank and absent attributes read as `None` without complaint. A value that
//! is present but will not convert records one diagnostic and also reads as
//! `None`, so only that field is skipped.

use std::collections::BTreeMap;
use std::str::FromStr;

use super::diagnostics::Diagnostics;
use crate::document::Element;

pub const NOT_APPLICABLE: &str = "N/A";
pub const DESTROYED: &str = "Destroyed";
pub const DEAD: &str = "Dead";

/// Anything with string attributes
pub trait Attributes {
    /// Raw value; `None` only when absent
    fn raw(&self, key: &str) -> Option<&str>;

    /// Trimmed value, `None` when absent or blank
    fn get(&self, key: &str) -> Option<&str> {
        self.raw(key).map(str::trim).filter(|v| !v.is_empty())
    }

    fn is_blank(&self, key: &str) -> bool {
        self.get(key).is_none()
    }

    /// "true" in any case is true; anything else, including blank, is false
    fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    fn parse<T: FromStr>(&self, key: &str, diags: &mut Diagnostics) -> Option<T> {
        let value = self.get(key)?;
        match value.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                diags.warn(format!("Invalid {} value: \"{}\"", key, value));
                None
            }
        }
    }

    fn int(&self, key: &str, diags: &mut Diagnostics) -> Option<i32> {
        self.parse::<i32>(key, diags)
    }

    fn float(&self, key: &str, diags: &mut Diagnostics) -> Option<f64> {
        self.parse::<f64>(key, diags)
    }

    /// Integer that must fall in `min..=max`
    fn int_in(&self, key: &str, min: i32, max: i32, diags: &mut Diagnostics) -> Option<i32> {
        let value = self.int(key, diags)?;
        if (min..=max).contains(&value) {
            Some(value)
        } else {
            diags.warn(format!(
                "{} value {} is outside {}..={}",
                key, value, min, max
            ));
            None
        }
    }
}

impl Attributes for Element {
    fn raw(&self, key: &str) -> Option<&str> {
        self.attr(key)
    }
}

/// Detached attribute map, used where attributes from several elements are merged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBag {
    values: BTreeMap<String, String>,
}

impl AttributeBag {
    pub fn from_element(element: &Element) -> Self {
        let mut bag = Self::default();
        bag.merge(element);
        bag
    }

    /// Copy every attribute of `element` over this bag
    pub fn merge(&mut self, element: &Element) {
        for (k, v) in element.attributes() {
            self.values.insert(k.to_string(), v.to_string());
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Same values with `infix` removed from every key containing it.
    /// Stripped keys replace unstripped ones of the same name.
    pub fn strip_infix(&self, infix: &str) -> Self {
        let mut values: BTreeMap<String, String> = self
            .values
            .iter()
            .filter(|(k, _)| !k.contains(infix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (k, v) in self.values.iter().filter(|(k, _)| k.contains(infix)) {
            values.insert(k.replace(infix, ""), v.clone());
        }
        Self { values }
    }
}

impl Attributes for AttributeBag {
    fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Split a delimited list, dropping blank entries
pub fn split_list<'a>(value: &'a str, separator: &str) -> Vec<&'a str> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_silent() {
        let el = Element::new("pilot").with_attr("gunnery", "  ");
        let mut diags = Diagnostics::new();
        assert_eq!(el.int("gunnery", &mut diags), None);
        assert_eq!(el.int("piloting", &mut diags), None);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_bad_number_warns_once() {
        let el = Element::new("pilot").with_attr("gunnery", "four");
        let mut diags = Diagnostics::new();
        assert_eq!(el.int("gunnery", &mut diags), None);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_range_check() {
        let el = Element::new("pilot").with_attr("hits", "6");
        let mut diags = Diagnostics::new();
        assert_eq!(el.int_in("hits", 0, 5, &mut diags), None);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_flag_is_case_insensitive() {
        let el = Element::new("entity").with_attr("hidden", "TRUE").with_attr("commander", "yes");
        assert!(el.flag("hidden"));
        assert!(!el.flag("commander"));
        assert!(!el.flag("offboard"));
    }

    #[test]
    fn test_bag_merge_and_strip() {
        let crew = Element::new("crew").with_attr("gunnery", "4").with_attr("gunneryAero", "3");
        let member = Element::new("crewMember").with_attr("gunnery", "2");
        let mut bag = AttributeBag::from_element(&crew);
        bag.merge(&member);
        assert_eq!(bag.get("gunnery"), Some("2"));

        let aero = bag.strip_infix("Aero");
        assert_eq!(aero.get("gunnery"), Some("3"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a:: b ::::c", "::"), vec!["a", "b", "c"]);
        assert!(split_list("", "::").is_empty());
    }
}
