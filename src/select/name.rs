// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the Name enum for the VMD-like selection language.

use regex::Regex;
use std::fmt;

use crate::errors::SelectError;
use crate::system::System;

/// Name of a residue, atom, or group. Either a literal string or a regular expression.
#[derive(Debug, Clone)]
pub enum Name {
    String(String),
    Regex(Regex),
}

impl Name {
    /// Create new `Name` enum. Strings in the form `r'...'` are compiled into regular expressions.
    pub fn new(string: &str) -> Result<Self, SelectError> {
        match string.strip_prefix("r'").and_then(|s| s.strip_suffix('\'')) {
            Some(pattern) => match Regex::new(pattern) {
                Ok(regex) => Ok(Name::Regex(regex)),
                Err(_) => Err(SelectError::InvalidRegex(string.to_owned())),
            },
            None => Ok(Name::String(string.to_owned())),
        }
    }

    /// Check whether `atom_index` is part of the specified group.
    pub fn match_groups(&self, system: &System, atom_index: usize) -> Result<bool, SelectError> {
        match self {
            Name::String(s) => system
                .group_isin(s, atom_index)
                .map_err(|_| SelectError::GroupNotFound(s.to_string())),

            // regex group names are expanded before matching in `Group::from_select`
            // this arm is only reached when matching is performed directly
            Name::Regex(r) => {
                for name in system.get_groups_as_ref().keys() {
                    if r.is_match(name) && system.group_isin(name, atom_index).unwrap_or(false) {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Name::String(s) => write!(f, "{}", s),
            Name::Regex(r) => write!(f, "r'{}'", r),
        }
    }
}

impl PartialEq<Name> for Name {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Name::String(s), Name::String(t)) => s == t,
            (Name::Regex(s), Name::Regex(t)) => s.as_str() == t.as_str(),
            _ => false,
        }
    }
}

impl PartialEq<str> for Name {
    /// Literal names must match exactly; regular expressions must match somewhere in the string.
    fn eq(&self, other: &str) -> bool {
        match self {
            Name::String(s) => s == other,
            Name::Regex(s) => s.is_match(other),
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
