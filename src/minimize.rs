use {
    crate::{Action, Catalog, Statement},
    log::trace,
    std::collections::{BTreeMap, BTreeSet},
};

/// Collapses statement actions into `service:Prefix*` wildcards that match nothing the statement did not already grant.
#[derive(Clone, Copy, Debug)]
pub struct Minimizer<'a> {
    catalog: &'a Catalog,
    min_chars: usize,
}

impl<'a> Minimizer<'a> {
    /// `min_chars` is the shortest action-name prefix that may be emitted.
    pub fn new(catalog: &'a Catalog, min_chars: usize) -> Self {
        Self {
            catalog,
            min_chars: min_chars.max(1),
        }
    }

    pub fn minimize_statement(&self, statement: &mut Statement) {
        let minimized = self.minimize(statement.action());
        statement.replace_actions(minimized);
    }

    /// Replace each action with the shortest prefix wildcard that matches no other action of its service outside
    /// `actions`. Actions of services missing from the catalog, and existing wildcards, are kept unchanged.
    pub fn minimize(&self, actions: &[Action]) -> Vec<Action> {
        let mut by_service: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        for action in actions {
            by_service.entry(action.service()).or_default().insert(action.action().to_ascii_lowercase());
        }

        let mut result = BTreeSet::new();
        for action in actions {
            let desired = &by_service[action.service()];
            let undesired: Vec<String> = match self.catalog.service(action.service()) {
                Ok(service) if !action.is_prefix() => service
                    .actions()
                    .iter()
                    .map(|a| a.name().to_ascii_lowercase())
                    .filter(|name| !desired.contains(name))
                    .collect(),
                _ => {
                    result.insert(action.clone());
                    continue;
                }
            };

            result.insert(self.shortest_prefix(action, &undesired));
        }

        result.into_iter().collect()
    }

    fn shortest_prefix(&self, action: &Action, undesired: &[String]) -> Action {
        let name = action.action();
        let lower = name.to_ascii_lowercase();

        for len in self.min_chars..name.len() {
            let prefix = &lower[..len];
            if undesired.iter().all(|u| !u.starts_with(prefix)) {
                if let Ok(minimized) = Action::new(action.service(), format!("{}*", &name[..len])) {
                    trace!("Minimized {action} to {minimized}");
                    return minimized;
                }
            }
        }

        action.clone()
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{catalog::fixture::catalog, Action, Minimizer},
        pretty_assertions::assert_eq,
        std::str::FromStr,
    };

    fn actions(names: &[&str]) -> Vec<Action> {
        names.iter().map(|n| Action::from_str(n).unwrap()).collect()
    }

    fn names(actions: &[Action]) -> Vec<String> {
        actions.iter().map(|a| a.to_string()).collect()
    }

    #[test_log::test]
    fn test_minimize() {
        let minimizer = Minimizer::new(catalog(), 0);

        // GetParameter, GetParameters and GetParametersByPath are the only ssm actions starting with "G".
        let result = minimizer.minimize(&actions(&["ssm:GetParameter", "ssm:GetParameters", "ssm:GetParametersByPath"]));
        assert_eq!(names(&result), vec!["ssm:G*"]);

        // GetObject alone cannot be shortened without also matching GetObjectAcl.
        let result = minimizer.minimize(&actions(&["s3:GetObject"]));
        assert_eq!(names(&result), vec!["s3:GetObject"]);

        let result = minimizer.minimize(&actions(&["s3:GetObject", "s3:GetObjectAcl"]));
        assert_eq!(names(&result), vec!["s3:GetO*"]);
    }

    #[test_log::test]
    fn test_min_chars() {
        let minimizer = Minimizer::new(catalog(), 5);
        let result = minimizer.minimize(&actions(&["ssm:GetParameter", "ssm:GetParameters", "ssm:GetParametersByPath"]));
        assert_eq!(names(&result), vec!["ssm:GetPa*"]);

        // A prefix at least as long as the name is never emitted.
        let minimizer = Minimizer::new(catalog(), 40);
        let result = minimizer.minimize(&actions(&["kms:ListKeys"]));
        assert_eq!(names(&result), vec!["kms:ListKeys"]);
    }

    #[test_log::test]
    fn test_passthrough() {
        let minimizer = Minimizer::new(catalog(), 1);
        let result = minimizer.minimize(&actions(&["frobozz:DoThing", "s3:Get*"]));
        assert_eq!(names(&result), vec!["frobozz:DoThing", "s3:Get*"]);
    }

    #[test_log::test]
    fn test_never_widens() {
        let minimizer = Minimizer::new(catalog(), 1);
        let desired = actions(&["iam:ListRoles", "iam:ListUsers"]);
        let result = minimizer.minimize(&desired);
        assert_eq!(names(&result), vec!["iam:ListR*", "iam:ListU*"]);

        for action in catalog().actions_for("iam").unwrap() {
            let granted = result.iter().any(|m| {
                action.name().to_ascii_lowercase().starts_with(&m.action().trim_end_matches('*').to_ascii_lowercase())
            });
            let wanted = desired.iter().any(|d| d.action() == action.name());
            assert_eq!(granted, wanted, "{}", action.name());
        }
    }
}
