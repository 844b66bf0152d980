//! Configuration access port trait.

/// Sectioned key/value configuration access, e.g. `[backtest]`, `[strategy]`
/// and `[data]` in the INI adapter. The typed getters return the default on
/// a missing or unparseable value; `get_string` distinguishes missing from
/// present so validation can report absent required keys.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
