//! Domain data structures for items, regions, coordinates, and submissions.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of a collectible item category.
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Category of waste a collection point may accept.
pub struct Item {
    /// Unique identifier assigned by the backend.
    pub id: ItemId,
    /// Display title, e.g. "Lâmpadas".
    pub title: String,
    /// Absolute URL of the item's illustration.
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Abbreviation of a federative unit (UF), e.g. `SP`.
pub struct RegionCode(pub String);

impl fmt::Display for RegionCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for RegionCode {
    fn from(code: &str) -> Self {
        RegionCode(code.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Name of a municipality inside a region.
pub struct LocalityName(pub String);

impl fmt::Display for LocalityName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for LocalityName {
    fn from(name: &str) -> Self {
        LocalityName(name.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// WGS84 position in decimal degrees.
pub struct Coordinate {
    /// Latitude, positive north.
    pub latitude: f64,
    /// Longitude, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Construct a coordinate without range checks.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components lie within their valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
/// Errors produced when parsing a `LAT,LNG` string.
pub enum CoordinateParseError {
    /// The input did not contain exactly two comma separated parts.
    #[error("expected `LAT,LNG`")]
    Shape,
    /// One of the components is not a number.
    #[error("invalid number: {0}")]
    Number(String),
    /// The components are outside of the valid latitude/longitude ranges.
    #[error("coordinate out of range")]
    OutOfRange,
}

impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split(',').map(str::trim);
        let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CoordinateParseError::Shape);
        };

        let parse = |raw: &str| {
            raw.parse::<f64>()
                .map_err(|_parse_err| CoordinateParseError::Number(raw.to_owned()))
        };
        let coordinate = Coordinate::new(parse(lat)?, parse(lng)?);

        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(CoordinateParseError::OutOfRange)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Free-text fields of the registration form.
pub enum FormField {
    /// Name of the entity running the collection point.
    Name,
    /// Contact e-mail.
    Email,
    /// Contact `WhatsApp` number.
    Whatsapp,
}

impl FormField {
    /// All fields in display order.
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Whatsapp];

    /// Key used for this field in the submission payload.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Whatsapp => "whatsapp",
        }
    }
}

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| UnknownField(key.to_owned()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown form field: {0}")]
/// Returned when a field name does not match any [`FormField`].
pub struct UnknownField(pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Text values typed by the user, one per [`FormField`].
pub struct FormFields {
    /// Entity name.
    pub name: String,
    /// Contact e-mail.
    pub email: String,
    /// Contact `WhatsApp` number.
    pub whatsapp: String,
}

impl FormFields {
    /// Current value of `field`.
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Whatsapp => &self.whatsapp,
        }
    }

    /// Mutable access to the value of `field`.
    pub fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Whatsapp => &mut self.whatsapp,
        }
    }

    /// Replace the value of one field, leaving the others untouched.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Set of item ids picked by the user.
pub struct SelectedItems(BTreeSet<ItemId>);

impl SelectedItems {
    /// Remove `id` when present, add it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    /// Whether `id` is part of the selection.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.0.contains(&id)
    }

    /// Number of selected items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selected ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ItemId> for SelectedItems {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        SelectedItems(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Body of `POST points`.
///
/// Unselected region, locality, or position are sent as `null`.
pub struct SubmissionPayload {
    /// Entity name.
    pub name: String,
    /// Contact e-mail.
    pub email: String,
    /// Contact `WhatsApp` number.
    pub whatsapp: String,
    /// Selected federative unit.
    pub uf: Option<RegionCode>,
    /// Selected municipality.
    pub city: Option<LocalityName>,
    /// Latitude of the selected map point.
    pub latitude: Option<f64>,
    /// Longitude of the selected map point.
    pub longitude: Option<f64>,
    /// Ids of the accepted item categories.
    pub items: Vec<ItemId>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn toggle_twice_restores_selection() {
        let mut selected: SelectedItems = [ItemId(1), ItemId(4)].into_iter().collect();
        let before = selected.clone();

        assert!(selected.toggle(ItemId(2)), "first toggle selects");
        assert!(!selected.toggle(ItemId(2)), "second toggle deselects");
        assert_eq!(selected, before);
    }

    #[test]
    fn toggle_never_duplicates() {
        let mut selected = SelectedItems::default();
        selected.toggle(ItemId(3));
        selected.toggle(ItemId(3));
        selected.toggle(ItemId(3));
        assert_eq!(selected.iter().collect::<Vec<_>>(), vec![ItemId(3)]);
    }

    #[test]
    fn set_field_preserves_other_fields() {
        let mut fields = FormFields {
            whatsapp: "11 99999-0000".into(),
            ..FormFields::default()
        };
        fields.set("email".parse().expect("known field"), "contato@ecoleta.dev");
        fields.set(FormField::Name, "Mercado do Zé");

        assert_eq!(
            fields,
            FormFields {
                name: "Mercado do Zé".into(),
                email: "contato@ecoleta.dev".into(),
                whatsapp: "11 99999-0000".into(),
            }
        );
    }

    #[test]
    fn unknown_field_name_is_rejected() {
        assert_eq!(
            "phone".parse::<FormField>(),
            Err(UnknownField("phone".into()))
        );
    }

    #[test]
    fn parses_coordinate_pairs() {
        assert_eq!(
            " -23.5 , -46.6 ".parse::<Coordinate>(),
            Ok(Coordinate::new(-23.5, -46.6))
        );
        assert_eq!("0,0".parse::<Coordinate>(), Ok(Coordinate::new(0.0, 0.0)));
        assert_eq!(
            "-23.5".parse::<Coordinate>(),
            Err(CoordinateParseError::Shape)
        );
        assert_eq!(
            "1,2,3".parse::<Coordinate>(),
            Err(CoordinateParseError::Shape)
        );
        assert_eq!(
            "north,-46.6".parse::<Coordinate>(),
            Err(CoordinateParseError::Number("north".into()))
        );
        assert_eq!(
            "91,0".parse::<Coordinate>(),
            Err(CoordinateParseError::OutOfRange)
        );
    }

    #[test]
    fn payload_serializes_backend_shape() {
        let payload = SubmissionPayload {
            name: "Ecoponto Lapa".into(),
            email: "lapa@ecoleta.dev".into(),
            whatsapp: "11988887777".into(),
            uf: Some("SP".into()),
            city: Some("São Paulo".into()),
            latitude: Some(-23.5),
            longitude: Some(-46.6),
            items: vec![ItemId(1), ItemId(3)],
        };

        let json = serde_json::to_value(&payload).expect("payload serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Ecoponto Lapa",
                "email": "lapa@ecoleta.dev",
                "whatsapp": "11988887777",
                "uf": "SP",
                "city": "São Paulo",
                "latitude": -23.5,
                "longitude": -46.6,
                "items": [1, 3],
            })
        );
    }
}
