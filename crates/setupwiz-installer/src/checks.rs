//! Prerequisite and tooling checks.

use setupwiz_core::{program_in_path, Prerequisite, PrerequisiteConfig};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CheckState {
    Ok,
    Warn,
    Fail,
}

pub struct CheckItem {
    pub label: String,
    pub state: CheckState,
    pub detail: String,
}

pub struct Checks {
    /// Helper programs the installer itself shells out to.
    pub tooling: Vec<CheckItem>,
    pub prerequisites: Vec<CheckItem>,
}

impl Checks {
    pub fn run(prerequisites: &[PrerequisiteConfig]) -> Self {
        let tooling = vec![
            tool_check("pgrep", "process detection unavailable"),
            tool_check("xdg-open", "help page cannot be opened"),
        ];

        let prerequisites = prerequisites
            .iter()
            .map(|prereq| {
                if program_in_path(&prereq.program) {
                    CheckItem::ok(&prereq.name, &prereq.detail)
                } else {
                    CheckItem::fail(&prereq.name, &prereq.detail)
                }
            })
            .collect();

        Self {
            tooling,
            prerequisites,
        }
    }

    pub fn unresolved(&self) -> Vec<Prerequisite> {
        self.prerequisites
            .iter()
            .filter(|item| item.state == CheckState::Fail)
            .map(|item| Prerequisite {
                name: item.label.clone(),
                detail: item.detail.clone(),
            })
            .collect()
    }
}

fn tool_check(program: &str, missing: &str) -> CheckItem {
    if program_in_path(program) {
        CheckItem::ok(program, "available")
    } else {
        CheckItem::warn(program, missing)
    }
}

impl CheckItem {
    fn ok(label: &str, detail: &str) -> Self {
        Self {
            label: label.to_string(),
            state: CheckState::Ok,
            detail: detail.to_string(),
        }
    }

    fn warn(label: &str, detail: &str) -> Self {
        Self {
            label: label.to_string(),
            state: CheckState::Warn,
            detail: detail.to_string(),
        }
    }

    fn fail(label: &str, detail: &str) -> Self {
        Self {
            label: label.to_string(),
            state: CheckState::Fail,
            detail: detail.to_string(),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self.state {
            CheckState::Ok => "[ok]",
            CheckState::Warn => "[warn]",
            CheckState::Fail => "[fail]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prerequisites_resolve() {
        let checks = Checks::run(&[]);
        assert!(checks.unresolved().is_empty());
        assert_eq!(checks.tooling.len(), 2);
    }

    #[test]
    fn missing_program_fails() {
        let checks = Checks::run(&[PrerequisiteConfig {
            name: "Runtime".to_string(),
            program: "setupwiz-definitely-missing".to_string(),
            detail: "install the runtime package".to_string(),
        }]);
        assert_eq!(checks.prerequisites[0].state, CheckState::Fail);
        assert_eq!(checks.prerequisites[0].tag(), "[fail]");
        assert_eq!(checks.unresolved()[0].detail, "install the runtime package");
    }
}
