//! # Suite — Registry of Variants and Resources
//!
//! A [`Suite`] is what a schema file parses into: the variant declarations in
//! source order and the resource definitions by name. It is built once and
//! only read afterwards, so one suite can serve any number of concurrent
//! comparisons. Each comparison keeps its own working state.
//!
//! ## Redefinition
//!
//! - Variants accumulate. Every declaration of a name is an alternative, and
//!   a reference to the name scores the best of them.
//! - Resources replace. A later `%% name` definition supersedes an earlier
//!   one.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use llsd_core::Value;
use tracing::debug;

use crate::definition::{ResourceDef, VariantDef};
use crate::error::{IdlError, Result};
use crate::matcher::Matcher;
use crate::parser::parse_suite;
use crate::score::Score;

/// Parsed schema definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suite {
    variants: Vec<VariantDef>,
    resources: BTreeMap<String, ResourceDef>,
}

impl Suite {
    /// Variant declarations in source order, duplicates included.
    pub fn variants(&self) -> &[VariantDef] {
        &self.variants
    }

    /// Resource definitions by name.
    pub fn resources(&self) -> &BTreeMap<String, ResourceDef> {
        &self.resources
    }

    /// Look up a resource definition.
    ///
    /// # Errors
    ///
    /// Returns [`IdlError::UnknownResource`] if no resource has this name.
    pub fn resource(&self, name: &str) -> Result<&ResourceDef> {
        self.resources.get(name).ok_or_else(|| {
            debug!(resource = name, "no matching resource definition");
            IdlError::UnknownResource(name.to_string())
        })
    }

    /// Grade an ad-hoc matcher against this suite's variants.
    pub fn compare(&self, matcher: &Matcher, value: &Value) -> Score {
        matcher.compare(value, &self.variants)
    }

    /// Grade a request body for the named resource.
    ///
    /// # Errors
    ///
    /// Returns [`IdlError::UnknownResource`] if no resource has this name.
    pub fn compare_request(&self, name: &str, value: &Value) -> Result<Score> {
        Ok(self.resource(name)?.compare_request(value, &self.variants))
    }

    /// Grade a response body for the named resource.
    ///
    /// # Errors
    ///
    /// Returns [`IdlError::UnknownResource`] if no resource has this name.
    pub fn compare_response(&self, name: &str, value: &Value) -> Result<Score> {
        Ok(self.resource(name)?.compare_response(value, &self.variants))
    }

    /// The request can be read at all.
    pub fn valid_request(&self, name: &str, value: &Value) -> Result<bool> {
        Ok(self.compare_request(name, value)?.is_valid())
    }

    /// The response can be read at all.
    pub fn valid_response(&self, name: &str, value: &Value) -> Result<bool> {
        Ok(self.compare_response(name, value)?.is_valid())
    }

    /// The request can be read and carries nothing unexpected.
    pub fn match_request(&self, name: &str, value: &Value) -> Result<bool> {
        Ok(self.compare_request(name, value)?.is_match())
    }

    /// The response can be read and carries nothing unexpected.
    pub fn match_response(&self, name: &str, value: &Value) -> Result<bool> {
        Ok(self.compare_response(name, value)?.is_match())
    }

    pub(crate) fn push_variant(&mut self, def: VariantDef) {
        self.variants.push(def);
    }

    pub(crate) fn insert_resource(&mut self, def: ResourceDef) {
        self.resources.insert(def.name.clone(), def);
    }
}

impl FromStr for Suite {
    type Err = IdlError;

    fn from_str(s: &str) -> Result<Self> {
        parse_suite(s)
    }
}

/// One definition per line: variants in source order, then resources by name.
impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for def in &self.variants {
            writeln!(f, "{def}")?;
        }
        for def in self.resources.values() {
            writeln!(f, "{def}")?;
        }
        Ok(())
    }
}
