use ecoleta_core::{
    form::{Completion, CreatePointForm, Notice, Request},
    model::{Coordinate, FormField},
};

use crate::map::MapView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Field(FormField),
    Map,
    Region,
    Locality,
    Items,
    Submit,
}

impl Focus {
    const ORDER: [Focus; 8] = [
        Focus::Field(FormField::Name),
        Focus::Field(FormField::Email),
        Focus::Field(FormField::Whatsapp),
        Focus::Map,
        Focus::Region,
        Focus::Locality,
        Focus::Items,
        Focus::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or_default()
    }

    pub(crate) fn next(self) -> Self {
        let index = (self.position() + 1) % Self::ORDER.len();
        Self::ORDER.get(index).copied().unwrap_or(self)
    }

    pub(crate) fn previous(self) -> Self {
        let index = (self.position() + Self::ORDER.len() - 1) % Self::ORDER.len();
        Self::ORDER.get(index).copied().unwrap_or(self)
    }
}

pub(crate) struct App {
    pub form: CreatePointForm,
    pub focus: Focus,

    /// Highlighted entry of the region list; 0 is "please select".
    pub region_index: usize,
    /// Highlighted entry of the locality list; 0 is "please select".
    pub locality_index: usize,
    pub item_index: usize,

    pub map: MapView,
    pub zoom: u8,

    pub notice: Option<Notice>,
}

impl App {
    pub(crate) fn new(zoom: u8) -> Self {
        Self {
            form: CreatePointForm::new(),
            focus: Focus::Field(FormField::Name),
            region_index: 0,
            locality_index: 0,
            item_index: 0,
            map: MapView::world(),
            zoom,
            notice: None,
        }
    }

    pub(crate) fn apply(&mut self, completion: Completion) {
        let had_center = self.form.initial_center().is_some();

        if let Some(notice) = self.form.apply(completion) {
            self.notice = Some(notice);
        }

        if !had_center
            && !self.map.touched
            && let Some(center) = self.form.initial_center()
        {
            self.map.focus_on(center, self.zoom);
        }

        self.clamp_indices();
    }

    pub(crate) fn select_highlighted_region(&mut self) -> Option<Request> {
        let choice = self
            .form
            .region_options()
            .nth(self.region_index)?
            .cloned();
        if choice.as_ref() != self.form.selected_region() {
            self.locality_index = 0;
        }
        self.form.select_region(choice)
    }

    pub(crate) fn select_highlighted_locality(&mut self) {
        let choice = self
            .form
            .locality_options()
            .nth(self.locality_index)
            .map(|choice| choice.cloned());
        if let Some(choice) = choice {
            self.form.select_locality(choice);
        }
    }

    pub(crate) fn toggle_highlighted_item(&mut self) {
        if let Some(id) = self.form.items().get(self.item_index).map(|item| item.id) {
            self.form.toggle_item(id);
        }
    }

    pub(crate) fn pick_point(&mut self, point: Coordinate) {
        self.form.select_map_point(point);
        self.focus = Focus::Map;
    }

    /// Center the map on the located position again, if there is one.
    pub(crate) fn recenter_map(&mut self) {
        if let Some(center) = self.form.initial_center() {
            self.map.focus_on(center, self.zoom);
        }
    }

    pub(crate) fn region_option_count(&self) -> usize {
        self.form.regions().len() + 1
    }

    pub(crate) fn locality_option_count(&self) -> usize {
        self.form.localities().len() + 1
    }

    fn clamp_indices(&mut self) {
        self.region_index = self.region_index.min(self.region_option_count() - 1);
        self.locality_index = self.locality_index.min(self.locality_option_count() - 1);
        self.item_index = self
            .item_index
            .min(self.form.items().len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use ecoleta_core::{
        model::{Item, ItemId, LocalityName, RegionCode},
        ports::PortError,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn loaded_app() -> App {
        let mut app = App::new(12);
        app.apply(Completion::Regions(Ok(vec![
            RegionCode::from("SP"),
            RegionCode::from("RJ"),
        ])));
        app.apply(Completion::Items(Ok(vec![
            Item {
                id: ItemId(1),
                title: "Lâmpadas".into(),
                image_url: "http://localhost:3333/uploads/lampadas.svg".into(),
            },
            Item {
                id: ItemId(2),
                title: "Papéis e Papelão".into(),
                image_url: "http://localhost:3333/uploads/papeis-papelao.svg".into(),
            },
        ])));
        app
    }

    #[test]
    fn focus_cycles_through_all_sections() {
        let mut focus = Focus::Field(FormField::Name);
        for _ in 0..Focus::ORDER.len() {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Field(FormField::Name));
        assert_eq!(Focus::Field(FormField::Name).previous(), Focus::Submit);
    }

    #[test]
    fn highlighted_sentinel_unselects_region() {
        let mut app = loaded_app();
        app.region_index = 1;
        assert!(
            matches!(app.select_highlighted_region(), Some(Request::Localities(_))),
            "picking SP fetches its cities"
        );
        assert_eq!(app.form.selected_region(), Some(&RegionCode::from("SP")));

        app.region_index = 0;
        assert_eq!(app.select_highlighted_region(), None);
        assert_eq!(app.form.selected_region(), None);
    }

    #[test]
    fn new_region_resets_locality_highlight() {
        let mut app = loaded_app();
        app.region_index = 2;
        let Some(Request::Localities(ticket)) = app.select_highlighted_region() else {
            panic!("RJ selection must fetch localities");
        };
        app.apply(Completion::Localities {
            ticket,
            result: Ok(vec![LocalityName::from("Niterói"), LocalityName::from("Maricá")]),
        });
        app.locality_index = 2;
        app.select_highlighted_locality();
        assert_eq!(app.form.selected_locality(), Some(&LocalityName::from("Maricá")));

        app.region_index = 1;
        let Some(Request::Localities(ticket)) = app.select_highlighted_region() else {
            panic!("SP selection must fetch localities");
        };
        app.apply(Completion::Localities {
            ticket,
            result: Ok(vec![LocalityName::from("Santos")]),
        });
        assert_eq!(app.locality_index, 0);
        assert_eq!(app.form.selected_locality(), None);
    }

    #[test]
    fn toggling_highlighted_item_marks_it() {
        let mut app = loaded_app();
        app.item_index = 1;
        app.toggle_highlighted_item();
        assert!(app.form.selected_items().contains(ItemId(2)), "second item selected");
        app.toggle_highlighted_item();
        assert!(app.form.selected_items().is_empty(), "toggled back off");
    }

    #[test]
    fn first_position_fix_centers_the_map() {
        let mut app = App::new(12);
        app.apply(Completion::Position(Ok(Coordinate::new(-8.05, -34.9))));
        assert_eq!(app.map.center, Coordinate::new(-8.05, -34.9));
        assert_eq!(app.map.zoom, 12);
    }

    #[test]
    fn position_fix_keeps_a_map_the_user_moved() {
        let mut app = App::new(12);
        app.map.pan(1, 0);
        let moved = app.map;
        app.apply(Completion::Position(Ok(Coordinate::new(-8.05, -34.9))));
        assert_eq!(app.map, moved);
    }

    #[test]
    fn map_pick_moves_marker() {
        let mut app = App::new(12);
        app.pick_point(Coordinate::new(-23.5, -46.6));
        assert_eq!(app.form.selected_point(), Some(Coordinate::new(-23.5, -46.6)));
        assert_eq!(app.focus, Focus::Map);
    }

    #[test]
    fn failed_submission_raises_error_notice() {
        let mut app = App::new(12);
        app.form.submit();
        app.apply(Completion::Submitted(Err(PortError::Timeout)));
        assert!(
            matches!(app.notice, Some(Notice::SubmitFailed(_))),
            "timeout must not look like success"
        );
    }
}
