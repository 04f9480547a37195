//! Resource Views
//!
//! [`ResourceView`] drives one editable resource: its list query, the
//! create/edit dialog, and the delete confirmation.
//!
//! ## Submit flow
//!
//! 1. Client-side constraint table; failures attach to fields, nothing is sent
//! 2. Create or update through the source
//! 3. Success: close dialog, notify, invalidate the resource's queries
//! 4. Failure: classify into field errors, an inline warning, or a
//!    notification; session loss is left to the session store
//!
//! Each action has its own in-flight flag; a second trigger while one is
//! running returns `Busy` without a request.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt::{Debug, Display};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use az_client::ApiError;
use az_common::{validate, FieldErrors, FormKind, Validate, ValidationContext};

use crate::classify::{ErrorClass, ErrorClassifier, STANDARD_CLASSIFIER};
use crate::error::ViewError;
use crate::notify::Notifications;
use crate::query::{ListQuery, ListSource, QueryClient, QueryKey};
use crate::session::SessionStore;

/// Success notifications for one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceMessages {
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
}

/// A list source that also supports create, update and delete
#[async_trait]
pub trait EditableSource: ListSource {
    type Key: Clone + Debug + Display + PartialEq + Send + Sync + 'static;
    type Input: Validate + Clone + Debug + Send + Sync + 'static;

    fn row_key(&self, row: &Self::Row) -> Self::Key;

    /// Form values for editing `row`
    fn edit_input(&self, row: &Self::Row) -> Self::Input;

    /// Form values for a new record
    fn blank_input(&self) -> Self::Input;

    /// Entity named in the delete confirmation, e.g. "studentul Pop Ana"
    fn describe(&self, row: &Self::Row) -> String;

    fn messages(&self) -> ResourceMessages;

    fn classifier(&self) -> &dyn ErrorClassifier {
        &STANDARD_CLASSIFIER
    }

    /// Classifier for delete failures; defaults to the save classifier
    fn delete_classifier(&self) -> &dyn ErrorClassifier {
        self.classifier()
    }

    async fn create(&self, input: &Self::Input) -> Result<(), ApiError>;

    async fn update(&self, key: &Self::Key, input: &Self::Input) -> Result<(), ApiError>;

    async fn delete(&self, key: &Self::Key) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogMode<K> {
    Create,
    Edit(K),
}

/// Open create/edit dialog
#[derive(Debug, Clone, PartialEq)]
pub struct FormDialog<K, I> {
    /// Changes every time a dialog is opened
    pub id: u64,
    pub mode: DialogMode<K>,
    pub values: I,
    pub field_errors: FieldErrors,
    /// Business-rule rejection shown inside the dialog until the next submit
    pub business_warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteConfirmation<K> {
    pub key: K,
    pub description: String,
}

impl<K> DeleteConfirmation<K> {
    pub fn prompt(&self) -> String {
        format!("Sigur doriți să ștergeți {}?", self.description)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved,
    /// Client-side constraints failed
    Invalid,
    Rejected(ErrorClass),
    Busy,
    NoDialog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed,
    Busy,
    NothingToConfirm,
}

/// Dependencies shared by every view
#[derive(Clone)]
pub struct ViewContext {
    pub queries: QueryClient,
    pub session: Arc<SessionStore>,
    pub notifications: Notifications,
    pub strict_phone: bool,
    pub page_size: u32,
}

/// Clears an in-flight flag when the action ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ResourceView<S: EditableSource> {
    source: Arc<S>,
    list: Arc<ListQuery<S>>,
    queries: QueryClient,
    session: Arc<SessionStore>,
    notifications: Notifications,
    strict_phone: bool,
    dialog: Mutex<Option<FormDialog<S::Key, S::Input>>>,
    confirm: Mutex<Option<DeleteConfirmation<S::Key>>>,
    dialog_seq: AtomicU64,
    submitting: AtomicBool,
    deleting: AtomicBool,
}

impl<S: EditableSource> ResourceView<S> {
    pub fn new(source: S, ctx: ViewContext) -> Self {
        let source = Arc::new(source);
        let list = ListQuery::new(source.clone(), QueryKey::new(source.name(), ctx.page_size));
        ctx.queries.register(&list);

        Self {
            source,
            list,
            queries: ctx.queries,
            session: ctx.session,
            notifications: ctx.notifications,
            strict_phone: ctx.strict_phone,
            dialog: Mutex::new(None),
            confirm: Mutex::new(None),
            dialog_seq: AtomicU64::new(0),
            submitting: AtomicBool::new(false),
            deleting: AtomicBool::new(false),
        }
    }

    pub fn list(&self) -> &Arc<ListQuery<S>> {
        &self.list
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn rows(&self) -> Vec<S::Row> {
        self.list.rows()
    }

    pub fn dialog(&self) -> Option<FormDialog<S::Key, S::Input>> {
        self.dialog.lock().clone()
    }

    pub fn confirmation(&self) -> Option<DeleteConfirmation<S::Key>> {
        self.confirm.lock().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.load(Ordering::SeqCst)
    }

    pub fn open_create(&self) -> Result<(), ViewError> {
        if !self.session.capabilities().can_create {
            return Err(ViewError::Forbidden);
        }
        *self.dialog.lock() = Some(FormDialog {
            id: self.next_dialog_id(),
            mode: DialogMode::Create,
            values: self.source.blank_input(),
            field_errors: FieldErrors::new(),
            business_warning: None,
        });
        Ok(())
    }

    pub fn open_edit(&self, row: &S::Row) -> Result<(), ViewError> {
        if !self.session.capabilities().can_create {
            return Err(ViewError::Forbidden);
        }
        *self.dialog.lock() = Some(FormDialog {
            id: self.next_dialog_id(),
            mode: DialogMode::Edit(self.source.row_key(row)),
            values: self.source.edit_input(row),
            field_errors: FieldErrors::new(),
            business_warning: None,
        });
        Ok(())
    }

    /// Edit the open form's values; false when no dialog is open
    pub fn update_form<F>(&self, edit: F) -> bool
    where
        F: FnOnce(&mut S::Input),
    {
        match self.dialog.lock().as_mut() {
            Some(dialog) => {
                edit(&mut dialog.values);
                true
            }
            None => false,
        }
    }

    pub fn close_dialog(&self) {
        self.dialog.lock().take();
    }

    fn next_dialog_id(&self) -> u64 {
        self.dialog_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply `f` only while dialog `id` is still the open one
    fn with_dialog<F: FnOnce(&mut FormDialog<S::Key, S::Input>)>(&self, id: u64, f: F) {
        if let Some(dialog) = self.dialog.lock().as_mut().filter(|d| d.id == id) {
            f(dialog);
        }
    }

    fn close_dialog_if(&self, id: u64) {
        let mut dialog = self.dialog.lock();
        if dialog.as_ref().is_some_and(|d| d.id == id) {
            dialog.take();
        }
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_in_flight) = InFlight::acquire(&self.submitting) else {
            debug!(resource = self.source.name(), "Submit ignored; already in flight");
            return SubmitOutcome::Busy;
        };

        let (id, mode, values) = {
            let mut dialog = self.dialog.lock();
            match dialog.as_mut() {
                Some(d) => {
                    d.field_errors = FieldErrors::new();
                    d.business_warning = None;
                    (d.id, d.mode.clone(), d.values.clone())
                }
                None => return SubmitOutcome::NoDialog,
            }
        };

        let kind = match mode {
            DialogMode::Create => FormKind::Create,
            DialogMode::Edit(_) => FormKind::Update,
        };
        let ctx = ValidationContext { kind, strict_phone: self.strict_phone };
        if let Err(errors) = validate(&values, &ctx) {
            debug!(resource = self.source.name(), fields = errors.len(), "Form rejected client-side");
            self.with_dialog(id, |d| d.field_errors = errors);
            return SubmitOutcome::Invalid;
        }

        let result = match &mode {
            DialogMode::Create => self.source.create(&values).await,
            DialogMode::Edit(key) => self.source.update(key, &values).await,
        };

        match result {
            Ok(()) => {
                let messages = self.source.messages();
                let message = match mode {
                    DialogMode::Create => messages.created,
                    DialogMode::Edit(_) => messages.updated,
                };
                info!(resource = self.source.name(), "Saved");
                self.close_dialog_if(id);
                self.notifications.success(message);
                self.queries.invalidate(self.source.name()).await;
                SubmitOutcome::Saved
            }
            Err(err) => {
                let class = self.source.classifier().classify(&err);
                match &class {
                    ErrorClass::SessionExpired => {}
                    ErrorClass::Validation(fields) => {
                        let fields = fields.clone();
                        self.with_dialog(id, |d| d.field_errors = fields);
                    }
                    ErrorClass::BusinessRule(message) => {
                        let message = message.clone();
                        self.with_dialog(id, |d| d.business_warning = Some(message));
                    }
                    ErrorClass::Transient(message) => {
                        self.notifications.error(message.clone());
                    }
                }
                debug!(resource = self.source.name(), class = ?class, "Save rejected");
                SubmitOutcome::Rejected(class)
            }
        }
    }

    pub fn request_delete(&self, row: &S::Row) -> Result<(), ViewError> {
        if !self.session.capabilities().can_delete {
            return Err(ViewError::Forbidden);
        }
        *self.confirm.lock() = Some(DeleteConfirmation {
            key: self.source.row_key(row),
            description: self.source.describe(row),
        });
        Ok(())
    }

    pub fn cancel_delete(&self) {
        self.confirm.lock().take();
    }

    pub async fn confirm_delete(&self) -> DeleteOutcome {
        let Some(_in_flight) = InFlight::acquire(&self.deleting) else {
            return DeleteOutcome::Busy;
        };

        let key = match self.confirm.lock().as_ref() {
            Some(confirmation) => confirmation.key.clone(),
            None => return DeleteOutcome::NothingToConfirm,
        };

        match self.source.delete(&key).await {
            Ok(()) => {
                info!(resource = self.source.name(), key = %key, "Deleted");
                self.confirm.lock().take();
                self.notifications.success(self.source.messages().deleted);
                self.queries.invalidate(self.source.name()).await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                match self.source.delete_classifier().classify(&err) {
                    ErrorClass::SessionExpired => {}
                    ErrorClass::BusinessRule(message) | ErrorClass::Transient(message) => {
                        self.notifications.error(message);
                    }
                    ErrorClass::Validation(_) => {
                        self.notifications.error(err.display_message());
                    }
                }
                DeleteOutcome::Failed
            }
        }
    }
}

impl<S: EditableSource> Drop for ResourceView<S> {
    fn drop(&mut self) {
        self.list.detach();
    }
}
