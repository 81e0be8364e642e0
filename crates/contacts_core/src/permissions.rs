use std::collections::BTreeMap;

use shared::domain::{Permission, PermissionState};
use tracing::info;

/// Everything the app asks for up front, matching the actions it offers.
pub const REQUIRED_PERMISSIONS: [Permission; 4] = [
    Permission::ReadContacts,
    Permission::CallPhone,
    Permission::SendSms,
    Permission::WriteContacts,
];

/// The user's answer to a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Allow,
    Deny,
    DontAskAgain,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionReport {
    pub granted: Vec<Permission>,
    pub denied: Vec<Permission>,
    pub permanently_denied: Vec<Permission>,
}

impl PermissionReport {
    pub fn all_granted(&self) -> bool {
        self.denied.is_empty() && self.permanently_denied.is_empty()
    }

    pub fn any_permanently_denied(&self) -> bool {
        !self.permanently_denied.is_empty()
    }
}

pub trait PermissionGate {
    fn state(&self, permission: Permission) -> PermissionState;

    /// Records the user's answer for every permission that can still be asked.
    fn request(&mut self, permissions: &[Permission], consent: Consent) -> PermissionReport;

    fn is_granted(&self, permission: Permission) -> bool {
        self.state(permission).is_granted()
    }

    fn all_granted(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.is_granted(*p))
    }

    fn report(&self, permissions: &[Permission]) -> PermissionReport {
        let mut report = PermissionReport::default();
        for permission in permissions {
            match self.state(*permission) {
                PermissionState::Granted => report.granted.push(*permission),
                PermissionState::PermanentlyDenied => report.permanently_denied.push(*permission),
                PermissionState::NotDetermined | PermissionState::Denied => {
                    report.denied.push(*permission)
                }
            }
        }
        report
    }
}

/// Grant table seeded from configuration; unlisted permissions start out
/// not determined.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredPermissions {
    states: BTreeMap<Permission, PermissionState>,
}

impl ConfiguredPermissions {
    pub fn new(states: impl IntoIterator<Item = (Permission, PermissionState)>) -> Self {
        Self {
            states: states.into_iter().collect(),
        }
    }

    pub fn grant_all() -> Self {
        Self::new(
            REQUIRED_PERMISSIONS
                .iter()
                .map(|p| (*p, PermissionState::Granted)),
        )
    }

    pub fn set_state(&mut self, permission: Permission, state: PermissionState) {
        self.states.insert(permission, state);
    }
}

impl PermissionGate for ConfiguredPermissions {
    fn state(&self, permission: Permission) -> PermissionState {
        self.states.get(&permission).copied().unwrap_or_default()
    }

    fn request(&mut self, permissions: &[Permission], consent: Consent) -> PermissionReport {
        for permission in permissions {
            let current = self.state(*permission);
            let next = match (current, consent) {
                (PermissionState::Granted, _) | (PermissionState::PermanentlyDenied, _) => current,
                (_, Consent::Allow) => PermissionState::Granted,
                (_, Consent::Deny) => PermissionState::Denied,
                (_, Consent::DontAskAgain) => PermissionState::PermanentlyDenied,
            };
            if next != current {
                info!(permission = ?permission, from = ?current, to = ?next, "permission state changed");
                self.states.insert(*permission, next);
            }
        }
        self.report(permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlisted_permissions_are_not_determined() {
        let gate = ConfiguredPermissions::default();
        assert_eq!(
            gate.state(Permission::ReadContacts),
            PermissionState::NotDetermined
        );
        assert!(!gate.all_granted(&REQUIRED_PERMISSIONS));
    }

    #[test]
    fn allowing_grants_everything_askable() {
        let mut gate = ConfiguredPermissions::new([(Permission::CallPhone, PermissionState::Denied)]);
        let report = gate.request(&REQUIRED_PERMISSIONS, Consent::Allow);
        assert!(report.all_granted());
        assert_eq!(report.granted.len(), REQUIRED_PERMISSIONS.len());
    }

    #[test]
    fn permanently_denied_is_never_reprompted() {
        let mut gate = ConfiguredPermissions::new([(
            Permission::SendSms,
            PermissionState::PermanentlyDenied,
        )]);
        let report = gate.request(&REQUIRED_PERMISSIONS, Consent::Allow);
        assert!(!report.all_granted());
        assert!(report.any_permanently_denied());
        assert_eq!(report.permanently_denied, vec![Permission::SendSms]);
        assert!(gate.is_granted(Permission::ReadContacts));
    }

    #[test]
    fn dont_ask_again_sticks() {
        let mut gate = ConfiguredPermissions::default();
        gate.request(&[Permission::ReadContacts], Consent::DontAskAgain);
        let report = gate.request(&[Permission::ReadContacts], Consent::Allow);
        assert!(report.any_permanently_denied());
        assert_eq!(
            gate.state(Permission::ReadContacts),
            PermissionState::PermanentlyDenied
        );
    }
}
