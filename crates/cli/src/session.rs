//! Add/edit form session.
//!
//! The form is either closed, adding a new tender (with a pre-generated id the
//! user can see), or editing an existing one (id read-only). The session is an
//! explicit value owned by the presentation layer.

use tenderdesk_core::{DomainError, DomainResult, Entity, TenderId};
use tenderdesk_storage::{BlobStore, RecordStore};
use tenderdesk_tenders::{TenderFields, TenderRecord, TenderStatus, TenderValue};

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenderForm {
    pub id: String,
    pub name: String,
    pub org: String,
    pub status: String,
    pub value: String,
    pub deadline: String,
    pub note: String,
}

impl TenderForm {
    /// Form prefilled from a stored tender.
    pub fn from_record(record: &TenderRecord) -> Self {
        Self {
            id: record.id().to_string(),
            name: record.name().to_string(),
            org: record.org().to_string(),
            status: record.status().to_string(),
            value: record.value().to_string(),
            deadline: record.deadline().to_string(),
            note: record.note().to_string(),
        }
    }

    /// Parse the form into tender fields.
    ///
    /// Unknown statuses become Draft and unparseable values become 0, as the
    /// form never blocks on them; a blank name or negative value is rejected.
    pub fn to_fields(&self) -> DomainResult<TenderFields> {
        let fields = TenderFields {
            name: self.name.trim().to_string(),
            org: self.org.trim().to_string(),
            status: TenderStatus::from_label_lenient(&self.status),
            value: TenderValue::parse_form(&self.value)?,
            deadline: self.deadline.trim().to_string(),
            note: self.note.clone(),
        };
        fields.validate()?;
        Ok(fields)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Closed,
    Adding {
        draft_id: TenderId,
    },
    Editing {
        id: TenderId,
    },
}

#[derive(Debug, Clone, Default)]
pub struct FormSession {
    mode: FormMode,
    form: TenderForm,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    /// Heading shown above the open form.
    pub fn title(&self) -> Option<&'static str> {
        match self.mode {
            FormMode::Closed => None,
            FormMode::Adding { .. } => Some("Add Tender"),
            FormMode::Editing { .. } => Some("Edit Tender"),
        }
    }

    /// The id field can only be changed while adding.
    pub fn id_read_only(&self) -> bool {
        matches!(self.mode, FormMode::Editing { .. })
    }

    pub fn form(&self) -> &TenderForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TenderForm {
        &mut self.form
    }

    /// Open an empty form with a freshly generated id.
    pub fn open_add(&mut self) -> TenderId {
        let draft_id = TenderId::generate();
        self.form = TenderForm {
            id: draft_id.to_string(),
            ..TenderForm::default()
        };
        self.mode = FormMode::Adding {
            draft_id: draft_id.clone(),
        };
        draft_id
    }

    /// Open the form prefilled from an existing tender.
    pub fn open_edit<B: BlobStore>(
        &mut self,
        store: &RecordStore<B>,
        id: &TenderId,
    ) -> DomainResult<()> {
        let record = store
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("tender {id}")))?;
        self.form = TenderForm::from_record(record);
        self.mode = FormMode::Editing { id: id.clone() };
        Ok(())
    }

    /// Save the form into the store and close it.
    ///
    /// On error the form stays open with its input intact.
    pub fn submit<B: BlobStore>(&mut self, store: &mut RecordStore<B>) -> DomainResult<TenderId> {
        let fields = self.form.to_fields()?;
        let id = match &self.mode {
            FormMode::Closed => return Err(DomainError::invariant("no form is open")),
            FormMode::Adding { draft_id } => {
                let id = match self.form.id.parse::<TenderId>() {
                    Ok(id) => id,
                    Err(_) => draft_id.clone(),
                };
                store.add_with_id(id, fields)?
            }
            FormMode::Editing { id } => {
                store.edit(id, fields)?;
                id.clone()
            }
        };
        self.cancel();
        Ok(id)
    }

    /// Close the form and discard its input.
    pub fn cancel(&mut self) {
        self.mode = FormMode::Closed;
        self.form = TenderForm::default();
    }
}
