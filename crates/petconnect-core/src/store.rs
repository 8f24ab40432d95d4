//! The `MarketplaceStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `petconnect-store-sqlite`). Higher layers (`petconnect-api`,
//! `petconnect-server`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Result,
  campaign::{Campaign, CampaignUpdate, NewCampaign},
  donation::{Donation, DonationReceipt, NewDonation},
  pet::{NewPet, Pet, PetUpdate, RequesterDetails},
  query::{CampaignQuery, DonationQuery, Page, PageParams, PetQuery},
  user::{NewUser, User, UserRole},
};

/// Abstraction over a PetConnect marketplace backend.
///
/// Methods return [`crate::Error`] directly so callers can distinguish
/// domain outcomes (not found, invalid transition, email taken) from
/// backend failures without inspecting a backend-specific error type.
///
/// Adoption transitions and donation recording are atomic: each one is a
/// single conditional mutation against the current row state, so two
/// racing calls cannot both succeed from the same prior state.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MarketplaceStore: Send + Sync {
  // ── Users ─────────────────────────────────────────────────────────────

  /// Register a new user. The email must be unused; a duplicate yields
  /// [`Error::EmailTaken`](crate::Error::EmailTaken).
  fn register_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User>> + Send + '_;

  /// Retrieve a user by UUID. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>>> + Send + '_;

  fn list_users(
    &self,
    page: PageParams,
  ) -> impl Future<Output = Result<Page<User>>> + Send + '_;

  /// Replace a user's role. Yields
  /// [`Error::UserNotFound`](crate::Error::UserNotFound) if the user does
  /// not exist.
  fn set_user_role(
    &self,
    id: Uuid,
    role: UserRole,
  ) -> impl Future<Output = Result<User>> + Send + '_;

  // ── Pets ──────────────────────────────────────────────────────────────

  /// List a new pet. It starts `not_adopted` with no requester.
  fn add_pet(
    &self,
    input: NewPet,
  ) -> impl Future<Output = Result<Pet>> + Send + '_;

  /// Retrieve a pet by UUID. Returns `None` if not found.
  fn get_pet(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Pet>>> + Send + '_;

  fn list_pets<'a>(
    &'a self,
    query: &'a PetQuery,
  ) -> impl Future<Output = Result<Page<Pet>>> + Send + 'a;

  /// Edit a pet's descriptive fields. Never touches the adoption state;
  /// use the transition methods for that.
  fn update_pet(
    &self,
    id: Uuid,
    update: PetUpdate,
  ) -> impl Future<Output = Result<Pet>> + Send + '_;

  /// Remove a pet listing outright, whatever its adoption state.
  fn delete_pet(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Adoption lifecycle ────────────────────────────────────────────────
  //
  // Each transition is a conditional update keyed on the statuses the
  // action is allowed from (see [`crate::adoption::AdoptionAction`]). A pet
  // in any other state yields `InvalidTransition`; a missing pet yields
  // `PetNotFound`.

  /// `not_adopted` → `requested`, attaching the requester's details.
  fn request_adoption(
    &self,
    pet_id: Uuid,
    requester: RequesterDetails,
  ) -> impl Future<Output = Result<Pet>> + Send + '_;

  /// `requested` → `adopted`. The requester details stay attached as the
  /// adopter of record.
  fn accept_request(
    &self,
    pet_id: Uuid,
  ) -> impl Future<Output = Result<Pet>> + Send + '_;

  /// `requested` → `not_adopted`, clearing the requester.
  fn reject_request(
    &self,
    pet_id: Uuid,
  ) -> impl Future<Output = Result<Pet>> + Send + '_;

  /// `requested` or `adopted` → `not_adopted`, clearing the requester.
  fn cancel_adoption(
    &self,
    pet_id: Uuid,
  ) -> impl Future<Output = Result<Pet>> + Send + '_;

  /// All pets owned by `owner_email` in `requested` or `adopted` state
  /// (pending and accepted requests alike), oldest request first.
  fn incoming_requests<'a>(
    &'a self,
    owner_email: &'a str,
  ) -> impl Future<Output = Result<Vec<Pet>>> + Send + 'a;

  /// All pets whose attached requester matches `requester_email`,
  /// regardless of owner, in both `requested` and `adopted` states.
  fn outgoing_requests<'a>(
    &'a self,
    requester_email: &'a str,
  ) -> impl Future<Output = Result<Vec<Pet>>> + Send + 'a;

  // ── Campaigns ─────────────────────────────────────────────────────────

  /// Create a campaign. It starts `active` with a zero total and an empty
  /// donor list.
  fn create_campaign(
    &self,
    input: NewCampaign,
  ) -> impl Future<Output = Result<Campaign>> + Send + '_;

  /// Retrieve a campaign by UUID. Returns `None` if not found.
  fn get_campaign(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Campaign>>> + Send + '_;

  fn list_campaigns<'a>(
    &'a self,
    query: &'a CampaignQuery,
  ) -> impl Future<Output = Result<Page<Campaign>>> + Send + 'a;

  /// Edit a campaign's descriptive fields or its target. Re-evaluates the
  /// completion rule when the target changes.
  fn update_campaign(
    &self,
    id: Uuid,
    update: CampaignUpdate,
  ) -> impl Future<Output = Result<Campaign>> + Send + '_;

  /// `active` → `paused`. A `completed` campaign yields
  /// [`Error::CampaignStateConflict`](crate::Error::CampaignStateConflict).
  fn pause_campaign(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Campaign>> + Send + '_;

  /// `paused` → `active`. Same conflict rule as [`Self::pause_campaign`].
  fn resume_campaign(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Campaign>> + Send + '_;

  /// Remove a campaign. Its donation ledger rows survive.
  fn delete_campaign(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Donations ─────────────────────────────────────────────────────────

  /// Append a donation to the ledger and fold it into the campaign's
  /// total, donor list and completion status, all in one transaction.
  /// Either both writes land or neither does.
  fn record_donation(
    &self,
    input: NewDonation,
  ) -> impl Future<Output = Result<DonationReceipt>> + Send + '_;

  /// Retrieve a donation by UUID. Returns `None` if not found.
  fn get_donation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Donation>>> + Send + '_;

  fn list_donations<'a>(
    &'a self,
    query: &'a DonationQuery,
  ) -> impl Future<Output = Result<Page<Donation>>> + Send + 'a;
}
