//! Headless state for the schema columns admin page.
//!
//! The presentation layer renders from these fields and calls the async
//! methods in response to user actions. Every successful mutation reloads
//! the list with the active filter; nothing is patched locally.

use crate::api_client::{ApiClientError, ColumnApi};
use crate::filter::ColumnFilter;
use crate::notifications::Notification;
use schemacol_core::{ColumnForm, ColumnId, CreateSchemaColumn, SchemaColumn, ValidationError};
use tokio::sync::watch;

#[derive(Debug, thiserror::Error)]
enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiClientError),
}

pub struct ColumnsPage<A: ColumnApi> {
    api: A,
    pub columns: Vec<SchemaColumn>,
    /// Filter of the last successful load; reused by every reload.
    pub filter: ColumnFilter,
    loading: watch::Sender<bool>,
    pub dialog_open: bool,
    /// Record the dialog is editing. `None` with the dialog open means create.
    pub editing: Option<SchemaColumn>,
    pub notifications: Vec<Notification>,
}

impl<A: ColumnApi> ColumnsPage<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            columns: Vec::new(),
            filter: ColumnFilter::none(),
            loading: watch::channel(false).0,
            dialog_open: false,
            editing: None,
            notifications: Vec::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Whether a list request is in flight.
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Handle on the loading state that stays readable while an async
    /// method holds the page.
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Fetch the list for `filter`. On failure the current rows and filter
    /// are kept.
    pub async fn load(&mut self, filter: ColumnFilter) -> bool {
        self.loading.send_replace(true);
        let result = self.api.list(&filter).await;
        self.loading.send_replace(false);

        match result {
            Ok(columns) => {
                tracing::debug!(count = columns.len(), ?filter, "Loaded schema columns");
                self.columns = columns;
                self.filter = filter;
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to load columns");
                self.notify(Notification::error(format!("Failed to load columns: {}", err)));
                false
            }
        }
    }

    pub async fn refresh(&mut self) -> bool {
        let filter = self.filter;
        self.load(filter).await
    }

    pub async fn clear_filters(&mut self) -> bool {
        self.load(ColumnFilter::none()).await
    }

    pub fn open_create(&mut self) {
        self.editing = None;
        self.dialog_open = true;
    }

    pub fn begin_edit(&mut self, column: SchemaColumn) {
        self.editing = Some(column);
        self.dialog_open = true;
    }

    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
        self.editing = None;
    }

    /// Draft for the open dialog: the edited record, or an empty form.
    pub fn form(&self) -> ColumnForm {
        self.editing
            .as_ref()
            .map(ColumnForm::from_column)
            .unwrap_or_default()
    }

    /// Create or update from `form`, depending on whether a record is under
    /// edit. Returns the record the backend sent back.
    pub async fn submit(&mut self, form: &ColumnForm) -> Option<SchemaColumn> {
        let editing_id = self.editing.as_ref().map(|c| c.column_id);
        let action = if editing_id.is_some() { "update" } else { "create" };

        let result = match form.validate() {
            Ok(payload) => self.send(editing_id, &payload).await,
            Err(err) => Err(SubmitError::from(err)),
        };

        match result {
            Ok(column) => {
                tracing::info!(column_id = column.column_id, action, "Schema column saved");
                let verb = if editing_id.is_some() { "updated" } else { "created" };
                self.notify(Notification::success(format!("Column {} successfully", verb)));
                self.close_dialog();
                self.refresh().await;
                Some(column)
            }
            Err(err) => {
                tracing::error!(error = %err, action, "Failed to save column");
                self.notify(Notification::error(format!(
                    "Failed to {} column: {}",
                    action, err
                )));
                None
            }
        }
    }

    async fn send(
        &self,
        editing_id: Option<ColumnId>,
        payload: &CreateSchemaColumn,
    ) -> Result<SchemaColumn, SubmitError> {
        let column = match editing_id {
            Some(id) => self.api.update(id, payload).await?,
            None => self.api.create(payload).await?,
        };
        Ok(column)
    }

    pub async fn delete(&mut self, id: ColumnId) -> bool {
        match self.api.remove(id).await {
            Ok(()) => {
                tracing::info!(column_id = id, "Schema column deleted");
                self.notify(Notification::success("Column deleted successfully"));
                self.refresh().await;
                true
            }
            Err(err) => {
                tracing::error!(error = %err, column_id = id, "Failed to delete column");
                self.notify(Notification::error(format!("Failed to delete column: {}", err)));
                false
            }
        }
    }
}
