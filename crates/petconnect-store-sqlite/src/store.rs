//! [`SqliteStore`] — the SQLite implementation of [`MarketplaceStore`].

use std::path::Path;

use chrono::Utc;
use petconnect_core::{
  Error as CoreError, Result as CoreResult,
  adoption::AdoptionAction,
  campaign::{Campaign, CampaignStatus, CampaignUpdate, DonorEntry, NewCampaign},
  donation::{Donation, DonationReceipt, NewDonation},
  pet::{AdoptionStatus, NewPet, Pet, PetUpdate, RequesterDetails},
  query::{CampaignQuery, DonationQuery, Page, PageParams, PetQuery},
  store::MarketplaceStore,
  user::{NewUser, User, UserRole},
};
use rusqlite::OptionalExtension as _;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawCampaign, RawDonation, RawPet, RawUser, decode_adoption_status,
    decode_campaign_status, encode_amount, encode_donors, encode_dt,
    encode_requester, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row mapping ─────────────────────────────────────────────────────────────
//
// Column lists are shared between every SELECT and its row mapper; the two
// must stay in the same order.

const USER_COLS: &str = "user_id, name, email, role, created_at";

const PET_COLS: &str = "pet_id, name, category, owner_email, status, \
                        requester, age, location, description, image_url, \
                        created_at, requested_at, adopted_at";

const CAMPAIGN_COLS: &str = "campaign_id, title, description, \
                             organizer_email, max_donation_amount, \
                             donated_amount, status, donors, created_at";

const DONATION_COLS: &str =
  "donation_id, donor_email, amount, campaign_id, external_ref, donated_at";

fn read_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:    row.get(0)?,
    name:       row.get(1)?,
    email:      row.get(2)?,
    role:       row.get(3)?,
    created_at: row.get(4)?,
  })
}

fn read_pet(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPet> {
  Ok(RawPet {
    pet_id:       row.get(0)?,
    name:         row.get(1)?,
    category:     row.get(2)?,
    owner_email:  row.get(3)?,
    status:       row.get(4)?,
    requester:    row.get(5)?,
    age:          row.get(6)?,
    location:     row.get(7)?,
    description:  row.get(8)?,
    image_url:    row.get(9)?,
    created_at:   row.get(10)?,
    requested_at: row.get(11)?,
    adopted_at:   row.get(12)?,
  })
}

fn read_campaign(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCampaign> {
  Ok(RawCampaign {
    campaign_id:         row.get(0)?,
    title:               row.get(1)?,
    description:         row.get(2)?,
    organizer_email:     row.get(3)?,
    max_donation_amount: row.get(4)?,
    donated_amount:      row.get(5)?,
    status:              row.get(6)?,
    donors:              row.get(7)?,
    created_at:          row.get(8)?,
  })
}

fn read_donation(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDonation> {
  Ok(RawDonation {
    donation_id:  row.get(0)?,
    donor_email:  row.get(1)?,
    amount:       row.get(2)?,
    campaign_id:  row.get(3)?,
    external_ref: row.get(4)?,
    donated_at:   row.get(5)?,
  })
}

/// Outcome of a conditional update: the row after the change, the status
/// that blocked it, or no row at all.
enum CasRow<T> {
  Updated(T),
  Blocked(String),
  Missing,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A PetConnect marketplace store backed by a single SQLite file.
///
/// Cloning is cheap; clones share the single underlying connection, and the
/// connection's worker thread runs every closure to completion before
/// starting the next one. That serialisation is what makes the conditional
/// updates and the donation transaction race-free.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Flush and close the underlying connection. Called on graceful
  /// shutdown; in-flight closures finish first.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .with_conn(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  /// Run `f` on the connection's worker thread. The closure returns this
  /// crate's `Result` so row decoding and domain checks can run inside it.
  async fn with_conn<R, F>(&self, f: F) -> Result<R>
  where
    R: Send + 'static,
    F: FnOnce(&mut rusqlite::Connection) -> Result<R> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        f(conn).map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
      })
      .await
      .map_err(|e| match e {
        tokio_rusqlite::Error::Other(boxed) => match boxed.downcast::<Error>()
        {
          Ok(ours) => *ours,
          Err(other) => Error::Database(tokio_rusqlite::Error::Other(other)),
        },
        other => Error::Database(other),
      })
  }

  /// Run one adoption transition as a conditional UPDATE keyed on the
  /// statuses `action` is allowed from. Zero rows changed is diagnosed in
  /// the same closure: a present row means the status blocked the action,
  /// an absent row means the pet does not exist.
  async fn transition(
    &self,
    pet_id: Uuid,
    action: AdoptionAction,
    set_sql: &str,
    set_args: Vec<String>,
  ) -> CoreResult<Pet> {
    let allowed = action
      .allowed_from()
      .iter()
      .map(|s| format!("'{}'", s.as_str()))
      .collect::<Vec<_>>()
      .join(", ");
    let update_sql = format!(
      "UPDATE pets SET {set_sql} WHERE pet_id = ? AND status IN ({allowed})"
    );
    let select_sql = format!("SELECT {PET_COLS} FROM pets WHERE pet_id = ?1");

    let id_str = encode_uuid(pet_id);
    let mut binds = set_args;
    binds.push(id_str.clone());

    let outcome = self
      .with_conn(move |conn| {
        let n =
          conn.execute(&update_sql, rusqlite::params_from_iter(binds.iter()))?;
        if n == 0 {
          let status: Option<String> = conn
            .query_row(
              "SELECT status FROM pets WHERE pet_id = ?1",
              rusqlite::params![id_str],
              |r| r.get(0),
            )
            .optional()?;
          return Ok(match status {
            Some(s) => CasRow::Blocked(s),
            None => CasRow::Missing,
          });
        }
        let raw =
          conn.query_row(&select_sql, rusqlite::params![id_str], read_pet)?;
        Ok(CasRow::Updated(raw))
      })
      .await?;

    match outcome {
      CasRow::Updated(raw) => Ok(raw.into_pet()?),
      CasRow::Blocked(s) => {
        let status = decode_adoption_status(&s)?;
        Err(CoreError::InvalidTransition { action, status })
      }
      CasRow::Missing => Err(CoreError::PetNotFound(pet_id)),
    }
  }

  /// Conditional campaign status flip (pause/resume), same diagnosis shape
  /// as [`Self::transition`].
  async fn campaign_cas(
    &self,
    id: Uuid,
    from: CampaignStatus,
    to: CampaignStatus,
  ) -> CoreResult<Campaign> {
    let update_sql = format!(
      "UPDATE campaigns SET status = '{}' \
       WHERE campaign_id = ?1 AND status = '{}'",
      to.as_str(),
      from.as_str()
    );
    let select_sql =
      format!("SELECT {CAMPAIGN_COLS} FROM campaigns WHERE campaign_id = ?1");
    let id_str = encode_uuid(id);

    let outcome = self
      .with_conn(move |conn| {
        let n = conn.execute(&update_sql, rusqlite::params![id_str])?;
        if n == 0 {
          let status: Option<String> = conn
            .query_row(
              "SELECT status FROM campaigns WHERE campaign_id = ?1",
              rusqlite::params![id_str],
              |r| r.get(0),
            )
            .optional()?;
          return Ok(match status {
            Some(s) => CasRow::Blocked(s),
            None => CasRow::Missing,
          });
        }
        let raw = conn.query_row(
          &select_sql,
          rusqlite::params![id_str],
          read_campaign,
        )?;
        Ok(CasRow::Updated(raw))
      })
      .await?;

    match outcome {
      CasRow::Updated(raw) => Ok(raw.into_campaign()?),
      CasRow::Blocked(s) => {
        let status = decode_campaign_status(&s)?;
        Err(CoreError::CampaignStateConflict { status })
      }
      CasRow::Missing => Err(CoreError::CampaignNotFound(id)),
    }
  }
}

// ─── MarketplaceStore impl ───────────────────────────────────────────────────

impl MarketplaceStore for SqliteStore {
  // ── Users ─────────────────────────────────────────────────────────────────

  async fn register_user(&self, input: NewUser) -> CoreResult<User> {
    input.validate()?;

    let user = User {
      user_id:    Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      role:       input.role,
      created_at: Utc::now(),
    };

    let id_str    = encode_uuid(user.user_id);
    let name      = user.name.clone();
    let email     = user.email.clone();
    let role_str  = user.role.as_str();
    let at_str    = encode_dt(user.created_at);

    let inserted = self
      .with_conn(move |conn| {
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(false);
        }
        conn.execute(
          "INSERT INTO users (user_id, name, email, role, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, email, role_str, at_str],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(CoreError::EmailTaken(user.email));
    }
    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> CoreResult<Option<User>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {USER_COLS} FROM users WHERE user_id = ?1");

    let raw: Option<RawUser> = self
      .with_conn(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], read_user)
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawUser::into_user).transpose()?)
  }

  async fn list_users(&self, page: PageParams) -> CoreResult<Page<User>> {
    let sql = format!(
      "SELECT {USER_COLS} FROM users ORDER BY created_at DESC \
       LIMIT {} OFFSET {}",
      page.limit(),
      page.offset()
    );

    let (total, raws) = self
      .with_conn(move |conn| {
        let total: i64 =
          conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], read_user)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawUser::into_user)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, total as u64, page))
  }

  async fn set_user_role(&self, id: Uuid, role: UserRole) -> CoreResult<User> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {USER_COLS} FROM users WHERE user_id = ?1");
    let role_str = role.as_str();

    let raw: Option<RawUser> = self
      .with_conn(move |conn| {
        let n = conn.execute(
          "UPDATE users SET role = ?1 WHERE user_id = ?2",
          rusqlite::params![role_str, id_str],
        )?;
        if n == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &sql,
          rusqlite::params![id_str],
          read_user,
        )?))
      })
      .await?;

    match raw {
      Some(raw) => Ok(raw.into_user()?),
      None => Err(CoreError::UserNotFound(id)),
    }
  }

  // ── Pets ──────────────────────────────────────────────────────────────────

  async fn add_pet(&self, input: NewPet) -> CoreResult<Pet> {
    input.validate()?;

    let pet = Pet {
      pet_id:       Uuid::new_v4(),
      name:         input.name,
      category:     input.category,
      owner_email:  input.owner_email,
      status:       AdoptionStatus::NotAdopted,
      requester:    None,
      age:          input.age,
      location:     input.location,
      description:  input.description,
      image_url:    input.image_url,
      created_at:   Utc::now(),
      requested_at: None,
      adopted_at:   None,
    };

    let id_str      = encode_uuid(pet.pet_id);
    let name        = pet.name.clone();
    let category    = pet.category.clone();
    let owner       = pet.owner_email.clone();
    let status_str  = pet.status.as_str();
    let age         = pet.age.clone();
    let location    = pet.location.clone();
    let description = pet.description.clone();
    let image_url   = pet.image_url.clone();
    let at_str      = encode_dt(pet.created_at);

    self
      .with_conn(move |conn| {
        conn.execute(
          "INSERT INTO pets (
             pet_id, name, category, owner_email, status,
             age, location, description, image_url, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            name,
            category,
            owner,
            status_str,
            age,
            location,
            description,
            image_url,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(pet)
  }

  async fn get_pet(&self, id: Uuid) -> CoreResult<Option<Pet>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {PET_COLS} FROM pets WHERE pet_id = ?1");

    let raw: Option<RawPet> = self
      .with_conn(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], read_pet)
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawPet::into_pet).transpose()?)
  }

  async fn list_pets(&self, query: &PetQuery) -> CoreResult<Page<Pet>> {
    let mut conds: Vec<String> = vec![];
    let mut binds: Vec<String> = vec![];

    if let Some(ref category) = query.category {
      conds.push("category = ? COLLATE NOCASE".into());
      binds.push(category.clone());
    }
    if !query.statuses.is_empty() {
      let marks = vec!["?"; query.statuses.len()].join(", ");
      conds.push(format!("status IN ({marks})"));
      binds.extend(query.statuses.iter().map(|s| s.as_str().to_owned()));
    }
    if let Some(ref owner) = query.owner_email {
      conds.push("owner_email = ?".into());
      binds.push(owner.clone());
    }
    if let Some(ref needle) = query.name_contains {
      conds.push("name LIKE ?".into());
      binds.push(format!("%{needle}%"));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    let count_sql = format!("SELECT COUNT(*) FROM pets {where_clause}");
    let page_sql = format!(
      "SELECT {PET_COLS} FROM pets {where_clause} \
       ORDER BY created_at DESC LIMIT {} OFFSET {}",
      query.page.limit(),
      query.page.offset()
    );
    let page = query.page;

    let (total, raws) = self
      .with_conn(move |conn| {
        let total: i64 = conn.query_row(
          &count_sql,
          rusqlite::params_from_iter(binds.iter()),
          |r| r.get(0),
        )?;
        let mut stmt = conn.prepare(&page_sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(binds.iter()), read_pet)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawPet::into_pet)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, total as u64, page))
  }

  async fn update_pet(&self, id: Uuid, update: PetUpdate) -> CoreResult<Pet> {
    if update.is_empty() {
      return Err(CoreError::EmptyUpdate);
    }

    let mut sets: Vec<&'static str> = vec![];
    let mut binds: Vec<String> = vec![];
    if let Some(name) = update.name {
      sets.push("name = ?");
      binds.push(name);
    }
    if let Some(category) = update.category {
      sets.push("category = ?");
      binds.push(category);
    }
    if let Some(age) = update.age {
      sets.push("age = ?");
      binds.push(age);
    }
    if let Some(location) = update.location {
      sets.push("location = ?");
      binds.push(location);
    }
    if let Some(description) = update.description {
      sets.push("description = ?");
      binds.push(description);
    }
    if let Some(image_url) = update.image_url {
      sets.push("image_url = ?");
      binds.push(image_url);
    }

    let update_sql = format!(
      "UPDATE pets SET {} WHERE pet_id = ?",
      sets.join(", ")
    );
    let select_sql = format!("SELECT {PET_COLS} FROM pets WHERE pet_id = ?1");
    let id_str = encode_uuid(id);
    binds.push(id_str.clone());

    let raw: Option<RawPet> = self
      .with_conn(move |conn| {
        let n =
          conn.execute(&update_sql, rusqlite::params_from_iter(binds.iter()))?;
        if n == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &select_sql,
          rusqlite::params![id_str],
          read_pet,
        )?))
      })
      .await?;

    match raw {
      Some(raw) => Ok(raw.into_pet()?),
      None => Err(CoreError::PetNotFound(id)),
    }
  }

  async fn delete_pet(&self, id: Uuid) -> CoreResult<()> {
    let id_str = encode_uuid(id);

    let n = self
      .with_conn(move |conn| {
        Ok(conn.execute(
          "DELETE FROM pets WHERE pet_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if n == 0 {
      return Err(CoreError::PetNotFound(id));
    }
    Ok(())
  }

  // ── Adoption lifecycle ────────────────────────────────────────────────────

  async fn request_adoption(
    &self,
    pet_id: Uuid,
    requester: RequesterDetails,
  ) -> CoreResult<Pet> {
    requester.validate()?;
    let requester_json = encode_requester(&requester)?;
    let now_str = encode_dt(Utc::now());

    self
      .transition(
        pet_id,
        AdoptionAction::Request,
        "status = 'requested', requester = ?, requested_at = ?",
        vec![requester_json, now_str],
      )
      .await
  }

  async fn accept_request(&self, pet_id: Uuid) -> CoreResult<Pet> {
    let now_str = encode_dt(Utc::now());

    self
      .transition(
        pet_id,
        AdoptionAction::Accept,
        "status = 'adopted', adopted_at = ?",
        vec![now_str],
      )
      .await
  }

  async fn reject_request(&self, pet_id: Uuid) -> CoreResult<Pet> {
    self
      .transition(
        pet_id,
        AdoptionAction::Reject,
        "status = 'not_adopted', requester = NULL, requested_at = NULL",
        vec![],
      )
      .await
  }

  async fn cancel_adoption(&self, pet_id: Uuid) -> CoreResult<Pet> {
    self
      .transition(
        pet_id,
        AdoptionAction::Cancel,
        "status = 'not_adopted', requester = NULL, requested_at = NULL, \
         adopted_at = NULL",
        vec![],
      )
      .await
  }

  async fn incoming_requests(&self, owner_email: &str) -> CoreResult<Vec<Pet>> {
    let owner = owner_email.to_owned();
    let sql = format!(
      "SELECT {PET_COLS} FROM pets \
       WHERE owner_email = ?1 AND status IN ('requested', 'adopted') \
       ORDER BY requested_at ASC"
    );

    let raws: Vec<RawPet> = self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![owner], read_pet)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(RawPet::into_pet)
        .collect::<Result<Vec<_>>>()?,
    )
  }

  async fn outgoing_requests(
    &self,
    requester_email: &str,
  ) -> CoreResult<Vec<Pet>> {
    let email = requester_email.to_owned();
    let sql = format!(
      "SELECT {PET_COLS} FROM pets \
       WHERE json_extract(requester, '$.email') = ?1 \
         AND status IN ('requested', 'adopted') \
       ORDER BY requested_at ASC"
    );

    let raws: Vec<RawPet> = self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![email], read_pet)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(RawPet::into_pet)
        .collect::<Result<Vec<_>>>()?,
    )
  }

  // ── Campaigns ─────────────────────────────────────────────────────────────

  async fn create_campaign(&self, input: NewCampaign) -> CoreResult<Campaign> {
    input.validate()?;

    let campaign = Campaign {
      campaign_id:         Uuid::new_v4(),
      title:               input.title,
      description:         input.description,
      organizer_email:     input.organizer_email,
      max_donation_amount: input.max_donation_amount,
      donated_amount:      Decimal::ZERO,
      status:              CampaignStatus::Active,
      donors:              vec![],
      created_at:          Utc::now(),
    };

    let id_str      = encode_uuid(campaign.campaign_id);
    let title       = campaign.title.clone();
    let description = campaign.description.clone();
    let organizer   = campaign.organizer_email.clone();
    let max_str     = encode_amount(campaign.max_donation_amount);
    let total_str   = encode_amount(campaign.donated_amount);
    let status_str  = campaign.status.as_str();
    let donors_json = encode_donors(&campaign.donors)?;
    let at_str      = encode_dt(campaign.created_at);

    self
      .with_conn(move |conn| {
        conn.execute(
          "INSERT INTO campaigns (
             campaign_id, title, description, organizer_email,
             max_donation_amount, donated_amount, status, donors, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            title,
            description,
            organizer,
            max_str,
            total_str,
            status_str,
            donors_json,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(campaign)
  }

  async fn get_campaign(&self, id: Uuid) -> CoreResult<Option<Campaign>> {
    let id_str = encode_uuid(id);
    let sql =
      format!("SELECT {CAMPAIGN_COLS} FROM campaigns WHERE campaign_id = ?1");

    let raw: Option<RawCampaign> = self
      .with_conn(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], read_campaign)
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawCampaign::into_campaign).transpose()?)
  }

  async fn list_campaigns(
    &self,
    query: &CampaignQuery,
  ) -> CoreResult<Page<Campaign>> {
    let mut conds: Vec<String> = vec![];
    let mut binds: Vec<String> = vec![];

    if let Some(ref organizer) = query.organizer_email {
      conds.push("organizer_email = ?".into());
      binds.push(organizer.clone());
    }
    if !query.statuses.is_empty() {
      let marks = vec!["?"; query.statuses.len()].join(", ");
      conds.push(format!("status IN ({marks})"));
      binds.extend(query.statuses.iter().map(|s| s.as_str().to_owned()));
    }
    if let Some(ref needle) = query.title_contains {
      conds.push("title LIKE ?".into());
      binds.push(format!("%{needle}%"));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    let count_sql = format!("SELECT COUNT(*) FROM campaigns {where_clause}");
    let page_sql = format!(
      "SELECT {CAMPAIGN_COLS} FROM campaigns {where_clause} \
       ORDER BY created_at DESC LIMIT {} OFFSET {}",
      query.page.limit(),
      query.page.offset()
    );
    let page = query.page;

    let (total, raws) = self
      .with_conn(move |conn| {
        let total: i64 = conn.query_row(
          &count_sql,
          rusqlite::params_from_iter(binds.iter()),
          |r| r.get(0),
        )?;
        let mut stmt = conn.prepare(&page_sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(binds.iter()), read_campaign)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawCampaign::into_campaign)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, total as u64, page))
  }

  async fn update_campaign(
    &self,
    id: Uuid,
    update: CampaignUpdate,
  ) -> CoreResult<Campaign> {
    if update.is_empty() {
      return Err(CoreError::EmptyUpdate);
    }
    update.validate()?;

    let id_str = encode_uuid(id);
    let select_sql =
      format!("SELECT {CAMPAIGN_COLS} FROM campaigns WHERE campaign_id = ?1");

    // Read-modify-write inside one transaction: lowering the target can
    // complete the campaign, and that decision must see a total no donation
    // can sneak past.
    let updated: Option<Campaign> = self
      .with_conn(move |conn| {
        let tx = conn.transaction()?;

        let raw: Option<RawCampaign> = tx
          .query_row(&select_sql, rusqlite::params![id_str], read_campaign)
          .optional()?;
        let Some(raw) = raw else {
          return Ok(None);
        };
        let mut campaign = raw.into_campaign()?;

        if let Some(title) = update.title {
          campaign.title = title;
        }
        if let Some(description) = update.description {
          campaign.description = Some(description);
        }
        if let Some(target) = update.max_donation_amount {
          campaign.max_donation_amount = target;
          campaign.status = campaign
            .status
            .after_donation(campaign.donated_amount, target);
        }

        tx.execute(
          "UPDATE campaigns
           SET title = ?1, description = ?2, max_donation_amount = ?3,
               status = ?4
           WHERE campaign_id = ?5",
          rusqlite::params![
            campaign.title,
            campaign.description,
            encode_amount(campaign.max_donation_amount),
            campaign.status.as_str(),
            id_str,
          ],
        )?;
        tx.commit()?;

        Ok(Some(campaign))
      })
      .await?;

    updated.ok_or(CoreError::CampaignNotFound(id))
  }

  async fn pause_campaign(&self, id: Uuid) -> CoreResult<Campaign> {
    self
      .campaign_cas(id, CampaignStatus::Active, CampaignStatus::Paused)
      .await
  }

  async fn resume_campaign(&self, id: Uuid) -> CoreResult<Campaign> {
    self
      .campaign_cas(id, CampaignStatus::Paused, CampaignStatus::Active)
      .await
  }

  async fn delete_campaign(&self, id: Uuid) -> CoreResult<()> {
    let id_str = encode_uuid(id);

    let n = self
      .with_conn(move |conn| {
        Ok(conn.execute(
          "DELETE FROM campaigns WHERE campaign_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if n == 0 {
      return Err(CoreError::CampaignNotFound(id));
    }
    Ok(())
  }

  // ── Donations ─────────────────────────────────────────────────────────────

  async fn record_donation(
    &self,
    input: NewDonation,
  ) -> CoreResult<DonationReceipt> {
    input.validate()?;

    let donation = Donation {
      donation_id:  Uuid::new_v4(),
      donor_email:  input.donor_email,
      amount:       input.amount,
      campaign_id:  input.campaign_id,
      external_ref: input.external_ref,
      donated_at:   input.donated_at.unwrap_or_else(Utc::now),
    };

    let donation_id_str = encode_uuid(donation.donation_id);
    let donor           = donation.donor_email.clone();
    let amount          = donation.amount;
    let amount_str      = encode_amount(donation.amount);
    let campaign_id     = donation.campaign_id;
    let campaign_id_str = encode_uuid(donation.campaign_id);
    let external_ref    = donation.external_ref.clone();
    let donated_at      = donation.donated_at;
    let donated_at_str  = encode_dt(donation.donated_at);
    let select_sql =
      format!("SELECT {CAMPAIGN_COLS} FROM campaigns WHERE campaign_id = ?1");

    // Ledger append and aggregate update commit together or not at all.
    let updated: Option<Campaign> = self
      .with_conn(move |conn| {
        let tx = conn.transaction()?;

        let raw: Option<RawCampaign> = tx
          .query_row(
            &select_sql,
            rusqlite::params![campaign_id_str],
            read_campaign,
          )
          .optional()?;
        let Some(raw) = raw else {
          return Ok(None);
        };
        let mut campaign = raw.into_campaign()?;

        tx.execute(
          "INSERT INTO donations (
             donation_id, donor_email, amount, campaign_id, external_ref,
             donated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            donation_id_str,
            donor,
            amount_str,
            campaign_id_str,
            external_ref,
            donated_at_str,
          ],
        )?;

        campaign.donated_amount += amount;
        campaign.status = campaign
          .status
          .after_donation(campaign.donated_amount, campaign.max_donation_amount);
        campaign.donors.push(DonorEntry {
          donor_email: donor,
          amount,
          donated_at,
        });

        let donors_json = encode_donors(&campaign.donors)?;
        tx.execute(
          "UPDATE campaigns
           SET donated_amount = ?1, status = ?2, donors = ?3
           WHERE campaign_id = ?4",
          rusqlite::params![
            encode_amount(campaign.donated_amount),
            campaign.status.as_str(),
            donors_json,
            campaign_id_str,
          ],
        )?;
        tx.commit()?;

        Ok(Some(campaign))
      })
      .await?;

    match updated {
      Some(campaign) => Ok(DonationReceipt { donation, campaign }),
      None => Err(CoreError::CampaignNotFound(campaign_id)),
    }
  }

  async fn get_donation(&self, id: Uuid) -> CoreResult<Option<Donation>> {
    let id_str = encode_uuid(id);
    let sql =
      format!("SELECT {DONATION_COLS} FROM donations WHERE donation_id = ?1");

    let raw: Option<RawDonation> = self
      .with_conn(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], read_donation)
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawDonation::into_donation).transpose()?)
  }

  async fn list_donations(
    &self,
    query: &DonationQuery,
  ) -> CoreResult<Page<Donation>> {
    let mut conds: Vec<String> = vec![];
    let mut binds: Vec<String> = vec![];

    if let Some(ref donor) = query.donor_email {
      conds.push("donor_email = ?".into());
      binds.push(donor.clone());
    }
    if let Some(campaign_id) = query.campaign_id {
      conds.push("campaign_id = ?".into());
      binds.push(encode_uuid(campaign_id));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    let count_sql = format!("SELECT COUNT(*) FROM donations {where_clause}");
    let page_sql = format!(
      "SELECT {DONATION_COLS} FROM donations {where_clause} \
       ORDER BY donated_at DESC LIMIT {} OFFSET {}",
      query.page.limit(),
      query.page.offset()
    );
    let page = query.page;

    let (total, raws) = self
      .with_conn(move |conn| {
        let total: i64 = conn.query_row(
          &count_sql,
          rusqlite::params_from_iter(binds.iter()),
          |r| r.get(0),
        )?;
        let mut stmt = conn.prepare(&page_sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(binds.iter()), read_donation)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawDonation::into_donation)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, total as u64, page))
  }
}
