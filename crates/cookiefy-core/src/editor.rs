// ── Site editing ──
//
// A `SiteDraft` is the transient editable copy of a site. It starts from
// the fetched record, takes field changes, and is validated before the
// update is sent. After a successful save the caller re-fetches the site
// and drops the draft.

use cookiefy_api::models::{Id, Site, SiteUpdate};

use crate::error::CoreError;

/// Field changes to apply to a draft. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SiteChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub contact: Option<String>,
    pub website: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub cuisine_type: Option<String>,
    pub is_vegan: Option<bool>,
    pub is_gluten_free: Option<bool>,
    pub is_halal: Option<bool>,
    pub active: Option<bool>,
}

impl SiteChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.contact.is_none()
            && self.website.is_none()
            && self.street.is_none()
            && self.city.is_none()
            && self.cuisine_type.is_none()
            && self.is_vegan.is_none()
            && self.is_gluten_free.is_none()
            && self.is_halal.is_none()
            && self.active.is_none()
    }
}

/// Editable copy of one site.
#[derive(Debug, Clone)]
pub struct SiteDraft {
    id: Id,
    original: SiteUpdate,
    edited: SiteUpdate,
}

impl SiteDraft {
    /// Start editing `site`. Records without an id cannot be saved.
    pub fn new(site: &Site) -> Result<Self, CoreError> {
        let id = site
            .id
            .clone()
            .ok_or_else(|| CoreError::validation("id", "site record has no id"))?;
        let original = SiteUpdate::from(site);
        Ok(Self {
            id,
            edited: original.clone(),
            original,
        })
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn edited(&self) -> &SiteUpdate {
        &self.edited
    }

    pub fn edited_mut(&mut self) -> &mut SiteUpdate {
        &mut self.edited
    }

    pub fn apply(&mut self, changes: SiteChanges) {
        let e = &mut self.edited;
        let SiteChanges {
            name,
            description,
            price,
            contact,
            website,
            street,
            city,
            cuisine_type,
            is_vegan,
            is_gluten_free,
            is_halal,
            active,
        } = changes;

        set(&mut e.name, name);
        set(&mut e.description, description);
        set(&mut e.price, price);
        set(&mut e.contact, contact);
        set(&mut e.website, website);
        set(&mut e.street, street);
        set(&mut e.city, city);
        set(&mut e.cuisine_type, cuisine_type);
        set(&mut e.is_vegan, is_vegan);
        set(&mut e.is_gluten_free, is_gluten_free);
        set(&mut e.is_halal, is_halal);
        set(&mut e.active, active);
    }

    /// Whether any field differs from the fetched record.
    pub fn is_dirty(&self) -> bool {
        self.edited != self.original
    }

    /// Client-side checks run before any request is made.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.edited.name.trim().is_empty() {
            return Err(CoreError::validation("name", "restaurant name is required"));
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (Id, SiteUpdate) {
        (self.id, self.edited)
    }
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *field = v;
    }
}
