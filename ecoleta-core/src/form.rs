//! State of the "create collection point" form.
//!
//! The form never performs I/O itself. Operations that need a lookup return a
//! [`Request`] describing it; the caller runs the request and feeds the outcome
//! back through [`CreatePointForm::apply`] as a [`Completion`].

use std::iter;

use tracing::{debug, info};

use crate::model::{
    Coordinate, FormField, FormFields, Item, ItemId, LocalityName, RegionCode, SelectedItems,
    SubmissionPayload,
};
use crate::ports::PortError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Progress of a single lookup.
pub enum Lookup {
    /// Never requested.
    #[default]
    Idle,
    /// Request in flight.
    Loading,
    /// Last request succeeded.
    Ready,
    /// Last request failed with the given message.
    Failed(String),
}

impl Lookup {
    /// Whether a new request for this lookup makes sense.
    #[must_use]
    pub fn needs_reload(&self) -> bool {
        matches!(self, Lookup::Idle | Lookup::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Tag attached to a locality fetch so late responses can be recognised.
pub struct LocalityTicket {
    /// Region the fetch was issued for.
    pub region: RegionCode,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
/// Side effect the caller has to run on behalf of the form.
pub enum Request {
    /// Resolve the current device position.
    Position,
    /// Load the item catalog.
    Items,
    /// Load the region codes.
    Regions,
    /// Load the localities of the ticket's region.
    Localities(LocalityTicket),
    /// Post a new collection point.
    Submit(SubmissionPayload),
}

#[derive(Debug)]
/// Outcome of a [`Request`].
pub enum Completion {
    /// Result of [`Request::Position`].
    Position(Result<Coordinate, PortError>),
    /// Result of [`Request::Items`].
    Items(Result<Vec<Item>, PortError>),
    /// Result of [`Request::Regions`].
    Regions(Result<Vec<RegionCode>, PortError>),
    /// Result of [`Request::Localities`].
    Localities {
        /// Ticket the request was issued with.
        ticket: LocalityTicket,
        /// Fetched locality names.
        result: Result<Vec<LocalityName>, PortError>,
    },
    /// Result of [`Request::Submit`].
    Submitted(Result<(), PortError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Blocking message the UI must show after a submission finishes.
pub enum Notice {
    /// The backend accepted the new point.
    Registered,
    /// The backend or the network rejected the submission.
    SubmitFailed(String),
}

#[derive(Debug, Default)]
/// All state owned by the registration form.
pub struct CreatePointForm {
    items: Vec<Item>,
    regions: Vec<RegionCode>,
    localities: Vec<LocalityName>,

    initial_center: Option<Coordinate>,

    fields: FormFields,
    selected_region: Option<RegionCode>,
    selected_locality: Option<LocalityName>,
    selected_point: Option<Coordinate>,
    selected_items: SelectedItems,

    position: Lookup,
    items_lookup: Lookup,
    regions_lookup: Lookup,
    localities_lookup: Lookup,

    locality_generation: u64,
    submitting: bool,
    last_error: Option<String>,
}

impl CreatePointForm {
    /// Empty form with nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the lookups that run once when the form is opened.
    pub fn mount(&mut self) -> Vec<Request> {
        self.position = Lookup::Loading;
        self.items_lookup = Lookup::Loading;
        self.regions_lookup = Lookup::Loading;
        vec![Request::Position, Request::Items, Request::Regions]
    }

    /// Re-issue every lookup that failed or never ran.
    pub fn reload(&mut self) -> Vec<Request> {
        let mut requests = Vec::new();
        if self.position.needs_reload() {
            self.position = Lookup::Loading;
            requests.push(Request::Position);
        }
        if self.items_lookup.needs_reload() {
            self.items_lookup = Lookup::Loading;
            requests.push(Request::Items);
        }
        if self.regions_lookup.needs_reload() {
            self.regions_lookup = Lookup::Loading;
            requests.push(Request::Regions);
        }
        if self.localities_lookup.needs_reload()
            && let Some(ticket) = self.next_locality_ticket()
        {
            requests.push(Request::Localities(ticket));
        }
        if !requests.is_empty() {
            self.last_error = None;
        }
        requests
    }

    /// Select a region, or the "please select" entry when `region` is `None`.
    ///
    /// A new region drops the previous region's localities and asks for its own.
    /// Choosing "please select" keeps the current locality list.
    pub fn select_region(&mut self, region: Option<RegionCode>) -> Option<Request> {
        if region == self.selected_region {
            return None;
        }
        debug!(?region, "region selected");
        self.selected_region = region;
        self.selected_locality = None;
        // Any fetch still in flight belongs to the previous selection.
        self.locality_generation += 1;
        if self.selected_region.is_none() {
            if self.localities_lookup == Lookup::Loading {
                self.localities_lookup = Lookup::Idle;
            }
            return None;
        }
        self.localities.clear();
        self.next_locality_ticket().map(Request::Localities)
    }

    /// Select a locality, or the "please select" entry when `locality` is `None`.
    ///
    /// Names outside the loaded locality list are ignored.
    pub fn select_locality(&mut self, locality: Option<LocalityName>) {
        if let Some(name) = &locality
            && !self.localities.contains(name)
        {
            debug!(locality = %name, "ignoring locality outside the loaded list");
            return;
        }
        self.selected_locality = locality;
    }

    /// Move the map marker to `point`.
    pub fn select_map_point(&mut self, point: Coordinate) {
        self.selected_point = Some(point);
    }

    /// Replace one text field, keeping the others.
    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        self.fields.set(field, value);
    }

    /// Mutable access to a text field for per-keystroke editing.
    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        self.fields.get_mut(field)
    }

    /// Add or remove an item from the selection. Returns whether it is now selected.
    pub fn toggle_item(&mut self, id: ItemId) -> bool {
        self.selected_items.toggle(id)
    }

    /// Build the payload from the current state.
    #[must_use]
    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            name: self.fields.name.clone(),
            email: self.fields.email.clone(),
            whatsapp: self.fields.whatsapp.clone(),
            uf: self.selected_region.clone(),
            city: self.selected_locality.clone(),
            latitude: self.selected_point.map(|point| point.latitude),
            longitude: self.selected_point.map(|point| point.longitude),
            items: self.selected_items.iter().collect(),
        }
    }

    /// Submit the form unless a submission is already in flight.
    pub fn submit(&mut self) -> Option<Request> {
        if self.submitting {
            debug!("submit ignored, previous submission still running");
            return None;
        }
        self.submitting = true;
        let payload = self.payload();
        info!(
            uf = ?payload.uf,
            city = ?payload.city,
            items = payload.items.len(),
            "submitting collection point"
        );
        Some(Request::Submit(payload))
    }

    /// Fold a finished request back into the form.
    pub fn apply(&mut self, completion: Completion) -> Option<Notice> {
        match completion {
            Completion::Position(result) => {
                match result {
                    Ok(center) => {
                        self.initial_center = Some(center);
                        self.position = Lookup::Ready;
                    }
                    Err(err) => self.position = self.failed("Could not locate you", &err),
                }
                None
            }
            Completion::Items(result) => {
                match result {
                    Ok(items) => {
                        self.items = items;
                        self.items_lookup = Lookup::Ready;
                    }
                    Err(err) => self.items_lookup = self.failed("Failed to load items", &err),
                }
                None
            }
            Completion::Regions(result) => {
                match result {
                    Ok(regions) => {
                        self.regions = regions;
                        self.regions_lookup = Lookup::Ready;
                    }
                    Err(err) => self.regions_lookup = self.failed("Failed to load states", &err),
                }
                None
            }
            Completion::Localities { ticket, result } => {
                if !self.is_current(&ticket) {
                    debug!(region = %ticket.region, "discarding stale locality response");
                    return None;
                }
                match result {
                    Ok(localities) => {
                        self.localities = localities;
                        self.localities_lookup = Lookup::Ready;
                    }
                    Err(err) => {
                        self.localities_lookup = self.failed("Failed to load cities", &err);
                    }
                }
                None
            }
            Completion::Submitted(result) => {
                self.submitting = false;
                match result {
                    Ok(()) => {
                        info!("collection point registered");
                        Some(Notice::Registered)
                    }
                    Err(err) => {
                        let message = format!("Registration failed: {err}");
                        self.last_error = Some(message.clone());
                        Some(Notice::SubmitFailed(message))
                    }
                }
            }
        }
    }

    /// Loaded item catalog.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Loaded region codes.
    #[must_use]
    pub fn regions(&self) -> &[RegionCode] {
        &self.regions
    }

    /// Loaded localities of the most recently resolved region.
    #[must_use]
    pub fn localities(&self) -> &[LocalityName] {
        &self.localities
    }

    /// Region dropdown entries; `None` is the "please select" entry.
    pub fn region_options(&self) -> impl Iterator<Item = Option<&RegionCode>> {
        iter::once(None).chain(self.regions.iter().map(Some))
    }

    /// Locality dropdown entries; `None` is the "please select" entry.
    pub fn locality_options(&self) -> impl Iterator<Item = Option<&LocalityName>> {
        iter::once(None).chain(self.localities.iter().map(Some))
    }

    /// Position reported by the locator, if known yet.
    #[must_use]
    pub fn initial_center(&self) -> Option<Coordinate> {
        self.initial_center
    }

    /// Point picked on the map, if any.
    #[must_use]
    pub fn selected_point(&self) -> Option<Coordinate> {
        self.selected_point
    }

    /// Current text values.
    #[must_use]
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Selected region, `None` while "please select" is active.
    #[must_use]
    pub fn selected_region(&self) -> Option<&RegionCode> {
        self.selected_region.as_ref()
    }

    /// Selected locality, `None` while "please select" is active.
    #[must_use]
    pub fn selected_locality(&self) -> Option<&LocalityName> {
        self.selected_locality.as_ref()
    }

    /// Selected item ids.
    #[must_use]
    pub fn selected_items(&self) -> &SelectedItems {
        &self.selected_items
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether any request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.submitting
            || [
                &self.position,
                &self.items_lookup,
                &self.regions_lookup,
                &self.localities_lookup,
            ]
            .into_iter()
            .any(|lookup| *lookup == Lookup::Loading)
    }

    /// State of the position lookup.
    #[must_use]
    pub fn position_lookup(&self) -> &Lookup {
        &self.position
    }

    /// State of the item catalog lookup.
    #[must_use]
    pub fn items_lookup(&self) -> &Lookup {
        &self.items_lookup
    }

    /// State of the region lookup.
    #[must_use]
    pub fn regions_lookup(&self) -> &Lookup {
        &self.regions_lookup
    }

    /// State of the locality lookup.
    #[must_use]
    pub fn localities_lookup(&self) -> &Lookup {
        &self.localities_lookup
    }

    /// Most recent lookup or submission error.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Forget the last error, e.g. after the user acknowledged it.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    fn next_locality_ticket(&mut self) -> Option<LocalityTicket> {
        let region = self.selected_region.clone()?;
        self.localities_lookup = Lookup::Loading;
        Some(LocalityTicket {
            region,
            generation: self.locality_generation,
        })
    }

    fn is_current(&self, ticket: &LocalityTicket) -> bool {
        ticket.generation == self.locality_generation
            && self.selected_region.as_ref() == Some(&ticket.region)
    }

    fn failed(&mut self, context: &str, err: &PortError) -> Lookup {
        let message = format!("{context}: {err}");
        debug!(%message, "lookup failed");
        self.last_error = Some(message.clone());
        Lookup::Failed(message)
    }
}
