//! Single-line export and import of tower layouts.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use quest_arcade_core::{MapKind, Point, TowerKind};
use serde::{Deserialize, Serialize};

const SNAPSHOT_DOMAIN: &str = "td";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the map and payload.
pub(crate) const SNAPSHOT_HEADER: &str = "td:v1";
/// Delimiter used to separate the prefix, map and payload.
const FIELD_DELIMITER: char = ':';

/// Towers placed on a map, in placement order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct TowerLayoutSnapshot {
    /// Map the layout was built for.
    pub(crate) map: MapKind,
    /// Towers composing the layout.
    pub(crate) towers: Vec<TowerLayoutTower>,
}

/// Tower description captured within a layout snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct TowerLayoutTower {
    /// Type of tower.
    pub(crate) kind: TowerKind,
    /// Center of the tower.
    pub(crate) position: Point,
}

#[derive(Serialize, Deserialize)]
struct SerializablePayload {
    towers: Vec<TowerLayoutTower>,
}

impl TowerLayoutSnapshot {
    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = SerializablePayload {
            towers: self.towers.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!("{SNAPSHOT_HEADER}:{}:{encoded}", map_id(self.map)))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let map = parts.next().ok_or(LayoutTransferError::MissingMap)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }
        if parts.next().is_some() {
            return Err(LayoutTransferError::TrailingFields);
        }

        let map = parse_map(map).map_err(LayoutTransferError::UnknownMap)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializablePayload =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            map,
            towers: decoded.towers,
        })
    }
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug, thiserror::Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The map segment was missing.
    #[error("layout string is missing the map")]
    MissingMap,
    /// The payload segment was missing.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// More segments followed the payload.
    #[error("layout string has unexpected trailing fields")]
    TrailingFields,
    /// The prefix segment was not recognised.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version segment was not recognised.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The map segment did not name a known map.
    #[error("{0}")]
    UnknownMap(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be converted to or from JSON.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

/// Snake-case identifier of a map, as used on the command line and in layout strings.
pub(crate) fn map_id(map: MapKind) -> &'static str {
    match map {
        MapKind::Greenlands => "greenlands",
        MapKind::VolcanicForge => "volcanic_forge",
        MapKind::CrystalCaverns => "crystal_caverns",
        MapKind::DarkCastle => "dark_castle",
    }
}

/// Parses a map identifier such as `volcanic_forge`.
pub(crate) fn parse_map(value: &str) -> Result<MapKind, String> {
    let wanted = value.trim().to_ascii_lowercase().replace('-', "_");
    MapKind::ALL
        .into_iter()
        .find(|map| map_id(*map) == wanted)
        .ok_or_else(|| {
            let known: Vec<_> = MapKind::ALL.into_iter().map(map_id).collect();
            format!("unknown map '{value}', expected one of {}", known.join(", "))
        })
}
