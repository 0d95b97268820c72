//! Typed getters and setters on [`Config`].
//!
//! Every getter comes in two forms: `name(path)` returns `None` when the
//! path is missing or holds the wrong kind, `name_or(path, default)` falls
//! back to `default` in both cases. Getters honor the active profile;
//! setters never do.

use super::Config;
use crate::error::Result;
use crate::node::{FromNode, Node};

impl Config {
    /// Convert the profile-resolved node at `path` into `T`.
    pub fn value<T: FromNode>(&self, path: &str) -> Option<T> {
        self.lookup(path, T::from_node).flatten()
    }

    pub fn value_or<T: FromNode>(&self, path: &str, default: T) -> T {
        self.value(path).unwrap_or(default)
    }

    // Scalars

    pub fn string(&self, path: &str) -> Option<String> {
        self.value(path)
    }

    pub fn string_or(&self, path: &str, default: &str) -> String {
        self.string(path).unwrap_or_else(|| default.to_string())
    }

    /// A 32-bit integer. Values outside the `i32` range miss.
    pub fn int(&self, path: &str) -> Option<i32> {
        self.value(path)
    }

    pub fn int_or(&self, path: &str, default: i32) -> i32 {
        self.value_or(path, default)
    }

    pub fn int64(&self, path: &str) -> Option<i64> {
        self.value(path)
    }

    pub fn int64_or(&self, path: &str, default: i64) -> i64 {
        self.value_or(path, default)
    }

    /// A 32-bit float. Integers widen; values beyond `f32` range miss.
    pub fn float32(&self, path: &str) -> Option<f32> {
        self.value(path)
    }

    pub fn float32_or(&self, path: &str, default: f32) -> f32 {
        self.value_or(path, default)
    }

    pub fn float64(&self, path: &str) -> Option<f64> {
        self.value(path)
    }

    pub fn float64_or(&self, path: &str, default: f64) -> f64 {
        self.value_or(path, default)
    }

    pub fn bool(&self, path: &str) -> Option<bool> {
        self.value(path)
    }

    pub fn bool_or(&self, path: &str, default: bool) -> bool {
        self.value_or(path, default)
    }

    // Lists: a single element of the wrong kind fails the whole read

    pub fn string_list(&self, path: &str) -> Option<Vec<String>> {
        self.value(path)
    }

    pub fn string_list_or(&self, path: &str, default: Vec<String>) -> Vec<String> {
        self.value_or(path, default)
    }

    pub fn int_list(&self, path: &str) -> Option<Vec<i32>> {
        self.value(path)
    }

    pub fn int_list_or(&self, path: &str, default: Vec<i32>) -> Vec<i32> {
        self.value_or(path, default)
    }

    pub fn int64_list(&self, path: &str) -> Option<Vec<i64>> {
        self.value(path)
    }

    pub fn int64_list_or(&self, path: &str, default: Vec<i64>) -> Vec<i64> {
        self.value_or(path, default)
    }

    pub fn float32_list(&self, path: &str) -> Option<Vec<f32>> {
        self.value(path)
    }

    pub fn float32_list_or(&self, path: &str, default: Vec<f32>) -> Vec<f32> {
        self.value_or(path, default)
    }

    pub fn float64_list(&self, path: &str) -> Option<Vec<f64>> {
        self.value(path)
    }

    pub fn float64_list_or(&self, path: &str, default: Vec<f64>) -> Vec<f64> {
        self.value_or(path, default)
    }

    pub fn bool_list(&self, path: &str) -> Option<Vec<bool>> {
        self.value(path)
    }

    pub fn bool_list_or(&self, path: &str, default: Vec<bool>) -> Vec<bool> {
        self.value_or(path, default)
    }

    // Setters

    /// Store `value` at exactly `path`, creating intermediate sections.
    ///
    /// The active profile is not applied. Fails if `path` is empty or
    /// crosses a non-section value.
    pub fn set(&mut self, path: &str, value: impl Into<Node>) -> Result<()> {
        self.tree.set(path, value)
    }

    pub fn set_string(&mut self, path: &str, value: &str) -> Result<()> {
        self.set(path, value)
    }

    pub fn set_int(&mut self, path: &str, value: i32) -> Result<()> {
        self.set(path, value)
    }

    pub fn set_int64(&mut self, path: &str, value: i64) -> Result<()> {
        self.set(path, value)
    }

    pub fn set_float32(&mut self, path: &str, value: f32) -> Result<()> {
        self.set(path, value)
    }

    pub fn set_float64(&mut self, path: &str, value: f64) -> Result<()> {
        self.set(path, value)
    }

    pub fn set_bool(&mut self, path: &str, value: bool) -> Result<()> {
        self.set(path, value)
    }

    pub fn set_list<T: Into<Node>>(&mut self, path: &str, values: Vec<T>) -> Result<()> {
        self.set(path, values)
    }
}
