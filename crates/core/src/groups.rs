//! Well-known groups and account types.
//!
//! Membership in a group grants access to a set of endpoints. The ids below
//! are seeded by `20260301000002_seed_core_groups.sql` and must never change.

use uuid::Uuid;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Account type groups
// ---------------------------------------------------------------------------

pub const GROUP_STUDENT: DbId = Uuid::from_u128(0x39691052_2ae5_4e12_99d0_7a9f5f2b0136);
pub const GROUP_FORMER_STUDENT: DbId = Uuid::from_u128(0xab4c7503_41b3_11ee_8177_089798f1a4a5);
pub const GROUP_STAFF: DbId = Uuid::from_u128(0x703056c4_be9d_475c_aa51_b7fc62a96aaa);
pub const GROUP_ASSOCIATION: DbId = Uuid::from_u128(0x29751438_103c_42f2_b09b_33fbb20758a7);
pub const GROUP_EXTERNAL: DbId = Uuid::from_u128(0xb1cd979e_ecc1_4bd0_bc2b_4dad2ba8cded);
pub const GROUP_DEMO: DbId = Uuid::from_u128(0xae4d1866_e7d9_4d7f_bee7_e0dda24d8dd8);

// ---------------------------------------------------------------------------
// Core and module groups
// ---------------------------------------------------------------------------

pub const GROUP_ADMIN: DbId = Uuid::from_u128(0x0a25cb76_4b63_4fd3_b939_da6d9feabf28);
pub const GROUP_AE: DbId = Uuid::from_u128(0x45649735_866a_49df_b04b_a13c74fd5886);
pub const GROUP_RAID_ADMIN: DbId = Uuid::from_u128(0xe9e6e3d3_9f5f_4e9b_8e5f_9f5f4e9b8e5f);
pub const GROUP_FEED_ADMIN: DbId = Uuid::from_u128(0x59e3c4c2_e60f_44b6_b0d2_fa1b248423bb);
pub const GROUP_SDEC_FACTURATION_ADMIN: DbId =
    Uuid::from_u128(0x7b5a4b8e_1c2d_4f3a_9e8b_2d6c1a0f5e34);
pub const GROUP_COMPETITION_ADMIN: DbId = Uuid::from_u128(0xe4e0c2a8_5b6f_4a71_8f0e_3c9d2b7a1e56);

/// Groups that cannot be deleted or renamed through the API.
pub const PROTECTED_GROUPS: &[DbId] = &[
    GROUP_STUDENT,
    GROUP_FORMER_STUDENT,
    GROUP_STAFF,
    GROUP_ASSOCIATION,
    GROUP_EXTERNAL,
    GROUP_DEMO,
    GROUP_ADMIN,
    GROUP_AE,
    GROUP_RAID_ADMIN,
    GROUP_FEED_ADMIN,
    GROUP_SDEC_FACTURATION_ADMIN,
    GROUP_COMPETITION_ADMIN,
];

/// Groups whose members count as part of the school community.
pub const ECL_GROUPS: &[DbId] = &[
    GROUP_AE,
    GROUP_STAFF,
    GROUP_STUDENT,
    GROUP_ASSOCIATION,
    GROUP_ADMIN,
];

/// Whether a group is seeded by migrations and must stay in place.
pub fn is_protected_group(group_id: DbId) -> bool {
    PROTECTED_GROUPS.contains(&group_id)
}

// ---------------------------------------------------------------------------
// Account types
// ---------------------------------------------------------------------------

pub const ACCOUNT_STUDENT: &str = "student";
pub const ACCOUNT_FORMER_STUDENT: &str = "former_student";
pub const ACCOUNT_STAFF: &str = "staff";
pub const ACCOUNT_ASSOCIATION: &str = "association";
pub const ACCOUNT_EXTERNAL: &str = "external";
pub const ACCOUNT_DEMO: &str = "demo";

/// All valid account type names.
pub const VALID_ACCOUNT_TYPES: &[&str] = &[
    ACCOUNT_STUDENT,
    ACCOUNT_FORMER_STUDENT,
    ACCOUNT_STAFF,
    ACCOUNT_ASSOCIATION,
    ACCOUNT_EXTERNAL,
    ACCOUNT_DEMO,
];

/// Validate an account type string.
pub fn validate_account_type(account_type: &str) -> Result<(), String> {
    if VALID_ACCOUNT_TYPES.contains(&account_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid account type '{account_type}'. Must be one of: {}",
            VALID_ACCOUNT_TYPES.join(", ")
        ))
    }
}

/// Each account type maps to the group its holders automatically join.
pub fn account_type_group(account_type: &str) -> Option<DbId> {
    match account_type {
        ACCOUNT_STUDENT => Some(GROUP_STUDENT),
        ACCOUNT_FORMER_STUDENT => Some(GROUP_FORMER_STUDENT),
        ACCOUNT_STAFF => Some(GROUP_STAFF),
        ACCOUNT_ASSOCIATION => Some(GROUP_ASSOCIATION),
        ACCOUNT_EXTERNAL => Some(GROUP_EXTERNAL),
        ACCOUNT_DEMO => Some(GROUP_DEMO),
        _ => None,
    }
}

/// True when any of `user_groups` appears in `allowed`.
pub fn has_any_group(user_groups: &[DbId], allowed: &[DbId]) -> bool {
    user_groups.iter().any(|g| allowed.contains(g))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_types_map_to_groups() {
        for account_type in VALID_ACCOUNT_TYPES {
            assert!(account_type_group(account_type).is_some());
        }
        assert_eq!(account_type_group(ACCOUNT_STUDENT), Some(GROUP_STUDENT));
        assert_eq!(account_type_group("wizard"), None);
    }

    #[test]
    fn protected_groups_include_admin_and_account_types() {
        assert!(is_protected_group(GROUP_ADMIN));
        assert!(is_protected_group(GROUP_EXTERNAL));
        assert!(!is_protected_group(Uuid::new_v4()));
    }

    #[test]
    fn ecl_membership() {
        assert!(has_any_group(&[GROUP_EXTERNAL, GROUP_STAFF], ECL_GROUPS));
        assert!(!has_any_group(&[GROUP_EXTERNAL, GROUP_DEMO], ECL_GROUPS));
        assert!(!has_any_group(&[], ECL_GROUPS));
    }

    #[test]
    fn invalid_account_type_rejected() {
        let err = validate_account_type("teacher").unwrap_err();
        assert!(err.contains("Invalid account type"));
        assert!(validate_account_type(ACCOUNT_STAFF).is_ok());
    }
}
