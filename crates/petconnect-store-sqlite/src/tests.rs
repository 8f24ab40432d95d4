//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone, Utc};
use petconnect_core::{
  Error,
  campaign::{CampaignStatus, CampaignUpdate, NewCampaign},
  donation::NewDonation,
  pet::{AdoptionStatus, NewPet, Pet, PetUpdate, RequesterDetails},
  query::{CampaignQuery, DonationQuery, PageParams, PetQuery},
  store::MarketplaceStore,
  user::{NewUser, UserRole},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(email: &str) -> NewUser {
  NewUser {
    name:  "Ada Lovelace".into(),
    email: email.into(),
    role:  UserRole::Adopter,
  }
}

fn new_pet(name: &str, owner: &str) -> NewPet {
  NewPet {
    name:        name.into(),
    category:    "dog".into(),
    owner_email: owner.into(),
    age:         Some("3".into()),
    location:    Some("Austin, TX".into()),
    description: None,
    image_url:   None,
  }
}

fn requester(email: &str) -> RequesterDetails {
  RequesterDetails {
    name:    "Finn Mertens".into(),
    email:   email.into(),
    contact: "555-0101".into(),
    address: "12 Elm St".into(),
  }
}

fn new_campaign(title: &str, target: Decimal) -> NewCampaign {
  NewCampaign {
    title:               title.into(),
    description:         None,
    organizer_email:     "shelter@example.com".into(),
    max_donation_amount: target,
  }
}

fn donation(campaign_id: Uuid, donor: &str, amount: Decimal) -> NewDonation {
  NewDonation {
    donor_email:  donor.into(),
    amount,
    campaign_id,
    external_ref: None,
    donated_at:   None,
  }
}

/// The requester/timestamp fields must track the status exactly.
fn assert_lifecycle_invariant(pet: &Pet) {
  match pet.status {
    AdoptionStatus::NotAdopted => {
      assert!(pet.requester.is_none());
      assert!(pet.requested_at.is_none());
      assert!(pet.adopted_at.is_none());
    }
    AdoptionStatus::Requested => {
      assert!(pet.requester.is_some());
      assert!(pet.requested_at.is_some());
      assert!(pet.adopted_at.is_none());
    }
    AdoptionStatus::Adopted => {
      assert!(pet.requester.is_some());
      assert!(pet.requested_at.is_some());
      assert!(pet.adopted_at.is_some());
    }
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_and_get_user() {
  let s = store().await;

  let user = s.register_user(new_user("ada@example.com")).await.unwrap();
  assert_eq!(user.email, "ada@example.com");
  assert_eq!(user.role, UserRole::Adopter);

  let fetched = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.user_id, user.user_id);
  assert_eq!(fetched.name, "Ada Lovelace");
}

#[tokio::test]
async fn register_duplicate_email_conflicts() {
  let s = store().await;
  s.register_user(new_user("ada@example.com")).await.unwrap();

  let err = s
    .register_user(new_user("ada@example.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmailTaken(ref e) if e == "ada@example.com"));
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_users_paginates() {
  let s = store().await;
  for i in 0..5 {
    s.register_user(new_user(&format!("u{i}@example.com")))
      .await
      .unwrap();
  }

  let page = s
    .list_users(PageParams { page: 1, per_page: 2 })
    .await
    .unwrap();
  assert_eq!(page.items.len(), 2);
  assert_eq!(page.total, 5);
  assert_eq!(page.page, 1);
  assert_eq!(page.per_page, 2);

  let last = s
    .list_users(PageParams { page: 3, per_page: 2 })
    .await
    .unwrap();
  assert_eq!(last.items.len(), 1);
  assert_eq!(last.total, 5);
}

#[tokio::test]
async fn set_user_role() {
  let s = store().await;
  let user = s.register_user(new_user("ada@example.com")).await.unwrap();

  let updated = s
    .set_user_role(user.user_id, UserRole::Admin)
    .await
    .unwrap();
  assert_eq!(updated.role, UserRole::Admin);

  let err = s
    .set_user_role(Uuid::new_v4(), UserRole::Owner)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UserNotFound(_)));
}

// ─── Pets ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_pet() {
  let s = store().await;

  let pet = s.add_pet(new_pet("Rex", "owner@example.com")).await.unwrap();
  assert_eq!(pet.status, AdoptionStatus::NotAdopted);
  assert!(pet.requester.is_none());

  let fetched = s.get_pet(pet.pet_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Rex");
  assert_eq!(fetched.owner_email, "owner@example.com");
  assert_eq!(fetched.age.as_deref(), Some("3"));
  assert_lifecycle_invariant(&fetched);
}

#[tokio::test]
async fn get_pet_missing_returns_none() {
  let s = store().await;
  assert!(s.get_pet(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn add_pet_rejects_blank_name() {
  let s = store().await;
  let mut input = new_pet("", "owner@example.com");
  input.name = "   ".into();

  let err = s.add_pet(input).await.unwrap_err();
  assert!(matches!(err, Error::MissingField("name")));
}

#[tokio::test]
async fn list_pets_filters() {
  let s = store().await;
  s.add_pet(new_pet("Rex", "a@example.com")).await.unwrap();
  s.add_pet(new_pet("Maple", "b@example.com")).await.unwrap();
  let mut cat = new_pet("Whiskers", "a@example.com");
  cat.category = "Cat".into();
  s.add_pet(cat).await.unwrap();

  // Category matching is case-insensitive.
  let cats = s
    .list_pets(&PetQuery { category: Some("cat".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(cats.total, 1);
  assert_eq!(cats.items[0].name, "Whiskers");

  let owned = s
    .list_pets(&PetQuery {
      owner_email: Some("a@example.com".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(owned.total, 2);

  // Substring match on name, also case-insensitive.
  let named = s
    .list_pets(&PetQuery {
      name_contains: Some("APl".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(named.total, 1);
  assert_eq!(named.items[0].name, "Maple");
}

#[tokio::test]
async fn list_pets_filters_by_status() {
  let s = store().await;
  let free = s.add_pet(new_pet("Rex", "a@example.com")).await.unwrap();
  let taken = s.add_pet(new_pet("Maple", "a@example.com")).await.unwrap();
  s.request_adoption(taken.pet_id, requester("finn@example.com"))
    .await
    .unwrap();

  let requested = s
    .list_pets(&PetQuery {
      statuses: vec![AdoptionStatus::Requested],
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(requested.total, 1);
  assert_eq!(requested.items[0].pet_id, taken.pet_id);

  let open = s
    .list_pets(&PetQuery {
      statuses: vec![AdoptionStatus::NotAdopted],
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(open.total, 1);
  assert_eq!(open.items[0].pet_id, free.pet_id);
}

#[tokio::test]
async fn update_pet_edits_listed_fields_only() {
  let s = store().await;
  let pet = s.add_pet(new_pet("Rex", "a@example.com")).await.unwrap();

  let updated = s
    .update_pet(pet.pet_id, PetUpdate {
      name: Some("Rexford".into()),
      location: Some("Dallas, TX".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.name, "Rexford");
  assert_eq!(updated.location.as_deref(), Some("Dallas, TX"));
  assert_eq!(updated.status, AdoptionStatus::NotAdopted);

  let err = s
    .update_pet(pet.pet_id, PetUpdate::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmptyUpdate));

  let err = s
    .update_pet(Uuid::new_v4(), PetUpdate {
      name: Some("Ghost".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::PetNotFound(_)));
}

#[tokio::test]
async fn delete_pet() {
  let s = store().await;
  let pet = s.add_pet(new_pet("Rex", "a@example.com")).await.unwrap();

  s.delete_pet(pet.pet_id).await.unwrap();
  assert!(s.get_pet(pet.pet_id).await.unwrap().is_none());

  let err = s.delete_pet(pet.pet_id).await.unwrap_err();
  assert!(matches!(err, Error::PetNotFound(_)));
}

// ─── Adoption lifecycle ──────────────────────────────────────────────────────

#[tokio::test]
async fn request_adoption_stores_requester() {
  let s = store().await;
  let pet = s.add_pet(new_pet("Rex", "a@example.com")).await.unwrap();

  let updated = s
    .request_adoption(pet.pet_id, requester("finn@example.com"))
    .await
    .unwrap();

  assert_eq!(updated.status, AdoptionStatus::Requested);
  let details = updated.requester.as_ref().unwrap();
  assert_eq!(details.email, "finn@example.com");
  assert_eq!(details.name, "Finn Mertens");
  assert!(updated.requested_at.is_some());
  assert_lifecycle_invariant(&updated);
}

#[tokio::test]
async fn second_request_conflicts() {
  let s = store().await;
  let pet = s.add_pet(new_pet("Rex", "a@example.com")).await.unwrap();
  s.request_adoption(pet.pet_id, requester("finn@example.com"))
    .await
    .unwrap();

  let err = s
    .request_adoption(pet.pet_id, requester("jake@example.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidTransition {
    status: AdoptionStatus::Requested,
    ..
  }));

  // The original request is untouched.
  let pet = s.get_pet(pet.pet_id).await.unwrap().unwrap();
  assert_eq!(pet.requester.unwrap().email, "finn@example.com");
}

#[tokio::test]
async fn request_missing_pet_not_found() {
  let s = store().await;
  let err = s
    .request_adoption(Uuid::new_v4(), requester("finn@example.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::PetNotFound(_)));
}

#[tokio::test]
async fn request_rejects_incomplete_details() {
  let s = store().await;
  let pet = s.add_pet(new_pet("Rex", "a@example.com")).await.unwrap();

  let mut details = requester("finn@example.com");
  details.address = "".into();

  let err = s.request_adoption(pet.pet_id, details).await.unwrap_err();
  assert!(matches!(err, Error::MissingField("requester address")));

  // Nothing changed.
  let pet = s.get_pet(pet.pet_id).await.unwrap().unwrap();
  assert_eq!(pet.status, AdoptionStatus::NotAdopted);
}

#[tokio::test]
async fn accept_keeps_requester_as_adopter_of_record() {
  let s = store().await;
  let pet = s.add_pet(new_pet("Rex", "a@example.com")).await.unwrap();
  s.request_adoption(pet.pet_id, requester("finn@example.com"))
    .await
    .unwrap();

  let adopted = s.accept_request(pet.pet_id).await.unwrap();
  assert_eq!(adopted.status, AdoptionStatus::Adopted);
  assert!(adopted.adopted_at.is_some());
  assert_eq!(adopted.requester.as_ref().unwrap().email, "finn@example.com");
  assert_lifecycle_invariant(&adopted);
}

#[tokio::test]
async fn accept_without_pending_request_conflicts() {
  let s = store().await;
  let pet = s.add_pet(new_pet("Rex", "a@example.com")).await.unwrap();

  let err = s.accept_request(pet.pet_id).await.unwrap_err();
  assert!(matches!(err, Error::InvalidTransition {
    status: AdoptionStatus::NotAdopted,
    ..
  }));

  // Still not adopted; the failed accept reported honestly.
  let pet = s.get_pet(pet.pet_id).await.unwrap().unwrap();
  assert_eq!(pet.status, AdoptionStatus::NotAdopted);
}

#[tokio::test]
async fn accept_missing_pet_not_found() {
  let s = store().await;
  let err = s.accept_request(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::PetNotFound(_)));
}

#[tokio::test]
async fn reject_clears_requester() {
  let s = store().await;
  let pet = s.add_pet(new_pet("Rex", "a@example.com")).await.unwrap();
  s.request_adoption(pet.pet_id, requester("finn@example.com"))
    .await
    .unwrap();

  let rejected = s.reject_request(pet.pet_id).await.unwrap();
  assert_eq!(rejected.status, AdoptionStatus::NotAdopted);
  assert!(rejected.requester.is_none());
  assert!(rejected.requested_at.is_none());
  assert_lifecycle_invariant(&rejected);
}

#[tokio::test]
async fn reject_with_nothing_pending_conflicts() {
  let s = store().await;
  let pet = s.add_pet(new_pet("Rex", "a@example.com")).await.unwrap();

  let err = s.reject_request(pet.pet_id).await.unwrap_err();
  assert!(matches!(err, Error::InvalidTransition { .. }));
}

#[tokio::test]
async fn cancel_from_requested_and_from_adopted() {
  let s = store().await;

  // Cancel a pending request.
  let pet = s.add_pet(new_pet("Rex", "a@example.com")).await.unwrap();
  s.request_adoption(pet.pet_id, requester("finn@example.com"))
    .await
    .unwrap();
  let cancelled = s.cancel_adoption(pet.pet_id).await.unwrap();
  assert_eq!(cancelled.status, AdoptionStatus::NotAdopted);
  assert_lifecycle_invariant(&cancelled);

  // Cancel a completed adoption; pet returns to the pool.
  let pet = s.add_pet(new_pet("Maple", "a@example.com")).await.unwrap();
  s.request_adoption(pet.pet_id, requester("finn@example.com"))
    .await
    .unwrap();
  s.accept_request(pet.pet_id).await.unwrap();
  let cancelled = s.cancel_adoption(pet.pet_id).await.unwrap();
  assert_eq!(cancelled.status, AdoptionStatus::NotAdopted);
  assert!(cancelled.adopted_at.is_none());
  assert_lifecycle_invariant(&cancelled);

  // A third cancel has nothing to undo.
  let err = s.cancel_adoption(pet.pet_id).await.unwrap_err();
  assert!(matches!(err, Error::InvalidTransition {
    status: AdoptionStatus::NotAdopted,
    ..
  }));
}

#[tokio::test]
async fn incoming_and_outgoing_requests() {
  let s = store().await;
  let rex = s.add_pet(new_pet("Rex", "owner@example.com")).await.unwrap();
  let maple = s
    .add_pet(new_pet("Maple", "owner@example.com"))
    .await
    .unwrap();
  let other = s
    .add_pet(new_pet("Biscuit", "someone@example.com"))
    .await
    .unwrap();

  s.request_adoption(rex.pet_id, requester("finn@example.com"))
    .await
    .unwrap();
  s.request_adoption(maple.pet_id, requester("jake@example.com"))
    .await
    .unwrap();
  s.accept_request(maple.pet_id).await.unwrap();
  s.request_adoption(other.pet_id, requester("finn@example.com"))
    .await
    .unwrap();

  // Owner sees pending and accepted requests on their own pets only.
  let incoming = s.incoming_requests("owner@example.com").await.unwrap();
  assert_eq!(incoming.len(), 2);
  assert!(incoming.iter().all(|p| p.owner_email == "owner@example.com"));

  // Requester sees their requests across owners.
  let outgoing = s.outgoing_requests("finn@example.com").await.unwrap();
  assert_eq!(outgoing.len(), 2);
  assert!(
    outgoing
      .iter()
      .all(|p| p.requester.as_ref().unwrap().email == "finn@example.com")
  );

  assert!(s.outgoing_requests("nobody@example.com").await.unwrap().is_empty());
}

// ─── Campaigns ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_campaign() {
  let s = store().await;

  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(500)))
    .await
    .unwrap();
  assert_eq!(c.status, CampaignStatus::Active);
  assert_eq!(c.donated_amount, Decimal::ZERO);
  assert!(c.donors.is_empty());

  let fetched = s.get_campaign(c.campaign_id).await.unwrap().unwrap();
  assert_eq!(fetched.title, "Vet fund");
  assert_eq!(fetched.max_donation_amount, dec!(500));
}

#[tokio::test]
async fn create_campaign_rejects_bad_input() {
  let s = store().await;

  let err = s
    .create_campaign(new_campaign("  ", dec!(100)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingField("title")));

  let err = s
    .create_campaign(new_campaign("Vet fund", dec!(0)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidAmount(_)));
}

#[tokio::test]
async fn list_campaigns_filters() {
  let s = store().await;
  s.create_campaign(new_campaign("Vet fund", dec!(100)))
    .await
    .unwrap();
  let mut other = new_campaign("Winter shelter", dec!(200));
  other.organizer_email = "rescue@example.com".into();
  s.create_campaign(other).await.unwrap();

  let by_org = s
    .list_campaigns(&CampaignQuery {
      organizer_email: Some("rescue@example.com".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_org.total, 1);
  assert_eq!(by_org.items[0].title, "Winter shelter");

  let by_title = s
    .list_campaigns(&CampaignQuery {
      title_contains: Some("winter".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_title.total, 1);

  let active = s
    .list_campaigns(&CampaignQuery {
      statuses: vec![CampaignStatus::Active],
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(active.total, 2);
}

#[tokio::test]
async fn update_campaign_lowering_target_completes() {
  let s = store().await;
  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(500)))
    .await
    .unwrap();
  s.record_donation(donation(c.campaign_id, "ada@example.com", dec!(120)))
    .await
    .unwrap();

  let updated = s
    .update_campaign(c.campaign_id, CampaignUpdate {
      max_donation_amount: Some(dec!(100)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.max_donation_amount, dec!(100));
  assert_eq!(updated.status, CampaignStatus::Completed);

  // Raising it back does not un-complete.
  let raised = s
    .update_campaign(c.campaign_id, CampaignUpdate {
      max_donation_amount: Some(dec!(1000)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(raised.status, CampaignStatus::Completed);
}

#[tokio::test]
async fn update_campaign_edits_fields() {
  let s = store().await;
  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(500)))
    .await
    .unwrap();

  let updated = s
    .update_campaign(c.campaign_id, CampaignUpdate {
      title: Some("Emergency vet fund".into()),
      description: Some("Surgery for Rex".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.title, "Emergency vet fund");
  assert_eq!(updated.description.as_deref(), Some("Surgery for Rex"));
  assert_eq!(updated.status, CampaignStatus::Active);

  let err = s
    .update_campaign(c.campaign_id, CampaignUpdate::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmptyUpdate));

  let err = s
    .update_campaign(Uuid::new_v4(), CampaignUpdate {
      title: Some("Ghost".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::CampaignNotFound(_)));
}

#[tokio::test]
async fn pause_and_resume() {
  let s = store().await;
  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(500)))
    .await
    .unwrap();

  let paused = s.pause_campaign(c.campaign_id).await.unwrap();
  assert_eq!(paused.status, CampaignStatus::Paused);

  // Pausing again finds nothing to pause.
  let err = s.pause_campaign(c.campaign_id).await.unwrap_err();
  assert!(matches!(err, Error::CampaignStateConflict {
    status: CampaignStatus::Paused,
  }));

  let resumed = s.resume_campaign(c.campaign_id).await.unwrap();
  assert_eq!(resumed.status, CampaignStatus::Active);

  let err = s.resume_campaign(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::CampaignNotFound(_)));
}

#[tokio::test]
async fn pause_completed_campaign_conflicts() {
  let s = store().await;
  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(100)))
    .await
    .unwrap();
  s.record_donation(donation(c.campaign_id, "ada@example.com", dec!(100)))
    .await
    .unwrap();

  let err = s.pause_campaign(c.campaign_id).await.unwrap_err();
  assert!(matches!(err, Error::CampaignStateConflict {
    status: CampaignStatus::Completed,
  }));
}

// ─── Donations ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn donation_updates_total_and_donor_list() {
  let s = store().await;
  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(500)))
    .await
    .unwrap();

  let receipt = s
    .record_donation(donation(c.campaign_id, "ada@example.com", dec!(25.50)))
    .await
    .unwrap();

  assert_eq!(receipt.donation.amount, dec!(25.50));
  assert_eq!(receipt.campaign.donated_amount, dec!(25.50));
  assert_eq!(receipt.campaign.status, CampaignStatus::Active);
  assert_eq!(receipt.campaign.donors.len(), 1);
  assert_eq!(receipt.campaign.donors[0].donor_email, "ada@example.com");
  assert_eq!(receipt.campaign.donors[0].amount, dec!(25.50));

  // The ledger row is retrievable on its own.
  let row = s
    .get_donation(receipt.donation.donation_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(row.amount, dec!(25.50));
  assert_eq!(row.campaign_id, c.campaign_id);
}

#[tokio::test]
async fn donation_crossing_target_completes_campaign() {
  let s = store().await;
  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(100)))
    .await
    .unwrap();
  s.record_donation(donation(c.campaign_id, "a@example.com", dec!(80)))
    .await
    .unwrap();

  let receipt = s
    .record_donation(donation(c.campaign_id, "b@example.com", dec!(25)))
    .await
    .unwrap();

  // Donations may overshoot the target; the overshoot is kept.
  assert_eq!(receipt.campaign.donated_amount, dec!(105));
  assert_eq!(receipt.campaign.status, CampaignStatus::Completed);
  assert_eq!(receipt.campaign.donors.len(), 2);
}

#[tokio::test]
async fn completed_campaign_keeps_accepting_and_never_reverts() {
  let s = store().await;
  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(100)))
    .await
    .unwrap();
  s.record_donation(donation(c.campaign_id, "a@example.com", dec!(100)))
    .await
    .unwrap();

  let receipt = s
    .record_donation(donation(c.campaign_id, "b@example.com", dec!(10)))
    .await
    .unwrap();
  assert_eq!(receipt.campaign.status, CampaignStatus::Completed);
  assert_eq!(receipt.campaign.donated_amount, dec!(110));
}

#[tokio::test]
async fn paused_campaign_still_accepts_donations() {
  let s = store().await;
  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(500)))
    .await
    .unwrap();
  s.pause_campaign(c.campaign_id).await.unwrap();

  let receipt = s
    .record_donation(donation(c.campaign_id, "a@example.com", dec!(30)))
    .await
    .unwrap();
  assert_eq!(receipt.campaign.status, CampaignStatus::Paused);
  assert_eq!(receipt.campaign.donated_amount, dec!(30));
}

#[tokio::test]
async fn donation_to_missing_campaign_leaves_no_ledger_row() {
  let s = store().await;

  let err = s
    .record_donation(donation(Uuid::new_v4(), "a@example.com", dec!(30)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::CampaignNotFound(_)));

  let ledger = s.list_donations(&DonationQuery::default()).await.unwrap();
  assert_eq!(ledger.total, 0);
}

#[tokio::test]
async fn donation_rejects_non_positive_amount() {
  let s = store().await;
  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(500)))
    .await
    .unwrap();

  let err = s
    .record_donation(donation(c.campaign_id, "a@example.com", dec!(0)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidAmount(_)));

  let c = s.get_campaign(c.campaign_id).await.unwrap().unwrap();
  assert_eq!(c.donated_amount, Decimal::ZERO);
}

#[tokio::test]
async fn donation_honours_caller_timestamp() {
  let s = store().await;
  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(500)))
    .await
    .unwrap();

  let when = Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap();
  let mut input = donation(c.campaign_id, "a@example.com", dec!(10));
  input.donated_at = Some(when);

  let receipt = s.record_donation(input).await.unwrap();
  assert_eq!(receipt.donation.donated_at, when);
  assert_eq!(receipt.campaign.donors[0].donated_at, when);
}

#[tokio::test]
async fn concurrent_donations_never_lose_updates() {
  let s = store().await;
  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(1000)))
    .await
    .unwrap();

  let mut handles = vec![];
  for i in 0..10 {
    let s = s.clone();
    let id = c.campaign_id;
    handles.push(tokio::spawn(async move {
      s.record_donation(donation(id, &format!("d{i}@example.com"), dec!(7)))
        .await
    }));
  }
  for h in handles {
    h.await.unwrap().unwrap();
  }

  let c = s.get_campaign(c.campaign_id).await.unwrap().unwrap();
  assert_eq!(c.donated_amount, dec!(70));
  assert_eq!(c.donors.len(), 10);

  let ledger = s
    .list_donations(&DonationQuery {
      campaign_id: Some(c.campaign_id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(ledger.total, 10);
}

#[tokio::test]
async fn ledger_survives_campaign_deletion() {
  let s = store().await;
  let c = s
    .create_campaign(new_campaign("Vet fund", dec!(500)))
    .await
    .unwrap();
  let receipt = s
    .record_donation(donation(c.campaign_id, "a@example.com", dec!(40)))
    .await
    .unwrap();

  s.delete_campaign(c.campaign_id).await.unwrap();
  assert!(s.get_campaign(c.campaign_id).await.unwrap().is_none());

  // The donation row is still on the books.
  let row = s
    .get_donation(receipt.donation.donation_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(row.amount, dec!(40));

  let err = s.delete_campaign(c.campaign_id).await.unwrap_err();
  assert!(matches!(err, Error::CampaignNotFound(_)));
}

#[tokio::test]
async fn list_donations_filters_and_orders() {
  let s = store().await;
  let c1 = s
    .create_campaign(new_campaign("Vet fund", dec!(500)))
    .await
    .unwrap();
  let c2 = s
    .create_campaign(new_campaign("Winter shelter", dec!(500)))
    .await
    .unwrap();

  let mut first = donation(c1.campaign_id, "ada@example.com", dec!(10));
  first.donated_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
  s.record_donation(first).await.unwrap();

  let mut second = donation(c1.campaign_id, "bob@example.com", dec!(20));
  second.donated_at = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
  s.record_donation(second).await.unwrap();

  s.record_donation(donation(c2.campaign_id, "ada@example.com", dec!(30)))
    .await
    .unwrap();

  let by_campaign = s
    .list_donations(&DonationQuery {
      campaign_id: Some(c1.campaign_id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_campaign.total, 2);
  // Newest first.
  assert_eq!(by_campaign.items[0].donor_email, "bob@example.com");

  let by_donor = s
    .list_donations(&DonationQuery {
      donor_email: Some("ada@example.com".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_donor.total, 2);

  let both = s
    .list_donations(&DonationQuery {
      donor_email: Some("ada@example.com".into()),
      campaign_id: Some(c1.campaign_id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(both.total, 1);
  assert_eq!(both.items[0].amount, dec!(10));
}

#[tokio::test]
async fn get_donation_missing_returns_none() {
  let s = store().await;
  assert!(s.get_donation(Uuid::new_v4()).await.unwrap().is_none());
}
