use crate::models::{JarType, Rates};

pub const JAR_RATE_KEY: &str = "jar_rate";
pub const CHILLED_RATE_KEY: &str = "chilled_rate";

pub const DEFAULT_JAR_RATE: f64 = 20.0;
pub const DEFAULT_CHILLED_RATE: f64 = 30.0;

/// Resolve the per-unit price for an entry.
///
/// Chilled jars always bill at the global chilled rate; a consumer-specific
/// override only applies to normal jars.
pub fn effective_rate(jar_type: JarType, custom_rate: Option<f64>, rates: &Rates) -> f64 {
    match jar_type {
        JarType::Chilled => rates.chilled,
        JarType::Normal => custom_rate.unwrap_or(rates.normal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATES: Rates = Rates {
        normal: 20.0,
        chilled: 30.0,
    };

    #[test]
    fn normal_uses_global_rate_without_override() {
        assert_eq!(effective_rate(JarType::Normal, None, &RATES), 20.0);
    }

    #[test]
    fn normal_prefers_consumer_override() {
        assert_eq!(effective_rate(JarType::Normal, Some(18.0), &RATES), 18.0);
    }

    #[test]
    fn chilled_ignores_consumer_override() {
        assert_eq!(effective_rate(JarType::Chilled, Some(18.0), &RATES), 30.0);
        assert_eq!(effective_rate(JarType::Chilled, None, &RATES), 30.0);
    }
}
