//! Who may act on whom.
//!
//! Pure policy checks: no IO, no side effects. Callers decide which error a
//! denial turns into.

use crate::user::errors::UserError;
use crate::user::models::User;

/// Decide whether `actor` may read or modify `target`.
///
/// Rules, first match wins:
/// 1. acting on oneself is allowed;
/// 2. nobody else may touch a superadmin;
/// 3. a superadmin may act on anyone else;
/// 4. an admin may act on users that are not admins;
/// 5. everything else is denied.
pub fn can_act_on(actor: &User, target: &User) -> bool {
    if actor.id == target.id {
        return true;
    }
    if target.roles.is_superadmin() {
        return false;
    }
    if actor.roles.is_superadmin() {
        return true;
    }
    actor.roles.is_admin() && !target.roles.is_admin()
}

/// Whether `actor` may grant or revoke the admin tag.
pub fn can_manage_privileges(actor: &User) -> bool {
    actor.roles.is_superadmin()
}

/// Guard for superadmin-only operations.
///
/// # Errors
/// * `Forbidden` - Actor does not hold `superadmin`
pub fn ensure_superadmin(actor: &User) -> Result<(), UserError> {
    if can_manage_privileges(actor) {
        Ok(())
    } else {
        Err(UserError::Forbidden)
    }
}

/// Guard wrapping [`can_act_on`].
///
/// # Errors
/// * `Forbidden` - Actor may not act on target
pub fn ensure_can_act_on(actor: &User, target: &User) -> Result<(), UserError> {
    if can_act_on(actor, target) {
        Ok(())
    } else {
        Err(UserError::Forbidden)
    }
}
