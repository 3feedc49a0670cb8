use serde::Serialize;
use std::fmt;

/// The two physical parking spots wired to the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotId {
    Spot1,
    Spot2,
}

impl SpotId {
    pub const ALL: [SpotId; 2] = [SpotId::Spot1, SpotId::Spot2];

    /// Parse a spot identifier as sent by the browser.
    /// `vaga1`/`vaga2` are accepted for older front-ends.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "spot1" | "vaga1" => Some(SpotId::Spot1),
            "spot2" | "vaga2" => Some(SpotId::Spot2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpotId::Spot1 => "spot1",
            SpotId::Spot2 => "spot2",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            SpotId::Spot1 => 0,
            SpotId::Spot2 => 1,
        }
    }

    /// Key the controller uses for this spot in its `/vaga` report
    pub fn report_key(&self) -> &'static str {
        match self {
            SpotId::Spot1 => "estado vaga 1",
            SpotId::Spot2 => "estado vaga 2",
        }
    }

    pub fn reserve_path(&self) -> &'static str {
        match self {
            SpotId::Spot1 => "/reservar_vaga1",
            SpotId::Spot2 => "/reservar_vaga2",
        }
    }

    pub fn release_path(&self) -> &'static str {
        match self {
            SpotId::Spot1 => "/liberar_vaga1",
            SpotId::Spot2 => "/liberar_vaga2",
        }
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Free,
    Occupied,
    Reserved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotColor {
    Green,
    Red,
    Blue,
}

impl SpotStatus {
    pub fn color(&self) -> SpotColor {
        match self {
            SpotStatus::Free => SpotColor::Green,
            SpotStatus::Occupied => SpotColor::Red,
            SpotStatus::Reserved => SpotColor::Blue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpotStatus::Free => "free",
            SpotStatus::Occupied => "occupied",
            SpotStatus::Reserved => "reserved",
        }
    }
}

impl SpotColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotColor::Green => "green",
            SpotColor::Red => "red",
            SpotColor::Blue => "blue",
        }
    }
}

/// What the controller's sensor says about a spot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupancy {
    Free,
    Occupied,
}

impl Occupancy {
    /// Read an occupancy phrase such as `"vaga 1 livre"`.
    ///
    /// Words are compared whole and case-insensitively; a phrase carrying
    /// both a free and an occupied token is treated as unrecognized.
    pub fn from_phrase(phrase: &str) -> Option<Self> {
        let mut free = false;
        let mut occupied = false;

        for word in phrase.split_whitespace() {
            let word = word.to_lowercase();
            match word.as_str() {
                "livre" | "free" => free = true,
                "ocupada" | "occupied" => occupied = true,
                _ => {}
            }
        }

        match (free, occupied) {
            (true, false) => Some(Occupancy::Free),
            (false, true) => Some(Occupancy::Occupied),
            _ => None,
        }
    }

    pub fn status(&self) -> SpotStatus {
        match self {
            Occupancy::Free => SpotStatus::Free,
            Occupancy::Occupied => SpotStatus::Occupied,
        }
    }
}

/// One snapshot of the controller's `/vaga` report.
/// `None` means the phrase for that spot was not understood.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpotReport {
    pub spot1: Option<Occupancy>,
    pub spot2: Option<Occupancy>,
}

impl SpotReport {
    pub fn get(&self, id: SpotId) -> Option<Occupancy> {
        match id {
            SpotId::Spot1 => self.spot1,
            SpotId::Spot2 => self.spot2,
        }
    }
}

/// Spot as rendered to the browser
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpotView {
    pub id: SpotId,
    pub status: SpotStatus,
    pub color: SpotColor,
}

impl SpotView {
    pub fn new(id: SpotId, status: SpotStatus) -> Self {
        Self {
            id,
            status,
            color: status.color(),
        }
    }
}
