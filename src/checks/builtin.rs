//! The built-in check catalogue.

use super::Checks;
use crate::rules;

/// Build the catalogue of every built-in check.
pub fn builtin_checks() -> Checks {
    let mut checks = Checks::new();
    rules::meta::register(&mut checks);
    rules::stable::register(&mut checks);
    rules::security::register(&mut checks);
    rules::networkpolicy::register(&mut checks);
    rules::apps::register(&mut checks);
    rules::disruptionbudget::register(&mut checks);
    rules::cronjob::register(&mut checks);
    rules::service::register(&mut checks);
    rules::ingress::register(&mut checks);
    rules::hpa::register(&mut checks);
    checks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Category;

    #[test]
    fn test_builtin_catalogue() {
        let checks = builtin_checks();
        assert_eq!(checks.len(), 24);

        let optional: Vec<&str> = checks
            .iter()
            .filter(|c| c.is_optional())
            .map(|c| c.id())
            .collect();
        assert_eq!(
            optional,
            vec![
                "container-seccomp-profile",
                "poddisruptionbudget-has-unhealthypodevictionpolicy"
            ]
        );

        assert_eq!(checks.for_category(Category::Meta).count(), 2);
        assert_eq!(checks.for_category(Category::Pod).count(), 5);
        assert!(checks.get("pod-networkpolicy").is_some());
    }
}
