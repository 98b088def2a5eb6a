//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Single-statement methods accept any `PgExecutor` (a `&PgPool` or a
//! `&mut PgConnection` borrowed from a [`TransactionalSession`]);
//! methods issuing several statements take `&mut PgConnection` so callers
//! decide the transaction boundary.
//!
//! [`TransactionalSession`]: crate::TransactionalSession

pub mod association_repo;
pub mod competition_participant_repo;
pub mod competition_team_repo;
pub mod core_data_repo;
pub mod edition_repo;
pub mod group_repo;
pub mod invite_token_repo;
pub mod invoice_association_repo;
pub mod invoice_individual_repo;
pub mod mandate_repo;
pub mod membership_repo;
pub mod news_repo;
pub mod order_repo;
pub mod product_repo;
pub mod raid_document_repo;
pub mod raid_participant_repo;
pub mod raid_team_repo;
pub mod recover_request_repo;
pub mod school_extension_repo;
pub mod school_repo;
pub mod sdec_member_repo;
pub mod security_file_repo;
pub mod session_repo;
pub mod sport_quota_repo;
pub mod sport_repo;
pub mod unconfirmed_user_repo;
pub mod user_repo;

pub use association_repo::AssociationRepo;
pub use competition_participant_repo::CompetitionParticipantRepo;
pub use competition_team_repo::CompetitionTeamRepo;
pub use core_data_repo::CoreDataRepo;
pub use edition_repo::EditionRepo;
pub use group_repo::GroupRepo;
pub use invite_token_repo::InviteTokenRepo;
pub use invoice_association_repo::InvoiceAssociationRepo;
pub use invoice_individual_repo::InvoiceIndividualRepo;
pub use mandate_repo::MandateRepo;
pub use membership_repo::MembershipRepo;
pub use news_repo::NewsRepo;
pub use order_repo::OrderRepo;
pub use product_repo::ProductRepo;
pub use raid_document_repo::RaidDocumentRepo;
pub use raid_participant_repo::RaidParticipantRepo;
pub use raid_team_repo::RaidTeamRepo;
pub use recover_request_repo::RecoverRequestRepo;
pub use school_extension_repo::SchoolExtensionRepo;
pub use school_repo::SchoolRepo;
pub use sdec_member_repo::SdecMemberRepo;
pub use security_file_repo::SecurityFileRepo;
pub use session_repo::SessionRepo;
pub use sport_quota_repo::SportQuotaRepo;
pub use sport_repo::SportRepo;
pub use unconfirmed_user_repo::UnconfirmedUserRepo;
pub use user_repo::UserRepo;
