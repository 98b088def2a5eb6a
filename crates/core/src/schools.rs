//! Base schools seeded by migrations.

use uuid::Uuid;

use crate::types::DbId;

/// Placeholder school for accounts not attached to any school.
pub const SCHOOL_NO_SCHOOL: DbId = Uuid::from_u128(0xdce19aa2_8863_4c93_861e_fb7be8f610ed);

/// The home school. Its email pattern decides student accounts.
pub const SCHOOL_CENTRALE_LYON: DbId = Uuid::from_u128(0xd9772da7_1142_4002_8b86_b694b431dfed);

/// Base schools cannot be deleted.
pub fn is_base_school(school_id: DbId) -> bool {
    school_id == SCHOOL_NO_SCHOOL || school_id == SCHOOL_CENTRALE_LYON
}
