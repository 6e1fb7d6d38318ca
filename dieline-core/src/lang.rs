//! User-visible strings, one table per supported language.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pl,
}

pub struct Texts {
    pub net_label: &'static str,
    pub gross_label: &'static str,
    pub footer: &'static str,
    pub box_title: &'static str,
    pub red_label: &'static str,
    pub red_desc: &'static str,
    pub blue_label: &'static str,
    pub blue_desc: &'static str,
    pub green_label: &'static str,
    pub green_desc: &'static str,
    pub card_header: &'static str,
    pub file_header: &'static str,
    pub card_title: &'static str,
}

const EN: Texts = Texts {
    net_label: "Net dimensions",
    gross_label: "Gross dimensions",
    footer: "All dimensions in mm. Verify before production.",
    box_title: "Box net",
    red_label: "Red Area (30%)",
    red_desc: "Bleed - will be trimmed off.",
    blue_label: "Hatched Area",
    blue_desc: "Unsafe area - keep text away.",
    green_label: "Empty Area",
    green_desc: "Safe area - place design here.",
    card_header: "CARD SIZE (CUT)",
    file_header: "FILE SIZE (BLEED)",
    card_title: "Template",
};

const PL: Texts = Texts {
    net_label: "Wymiary netto",
    gross_label: "Wymiary brutto",
    footer: "Wszystkie wymiary w mm. Sprawdź przed produkcją.",
    box_title: "Siatka pudełka",
    red_label: "Obszar czerwony (30%)",
    red_desc: "Spad - zostanie odcięty.",
    blue_label: "Obszar zakreskowany",
    blue_desc: "Margines techniczny - brak ważnych grafik.",
    green_label: "Obszar pusty",
    green_desc: "Obszar bezpieczny - miejsce na Twój projekt.",
    card_header: "WYMIAR KARTY (NETTO)",
    file_header: "WYMIAR PLIKU (BRUTTO)",
    card_title: "Szablon",
};

impl Language {
    /// Case-insensitive; anything other than a Polish tag means English.
    pub fn from_tag(tag: &str) -> Language {
        let t = tag.trim().to_ascii_lowercase();
        match t.split(['-', '_']).next() {
            Some("pl") => Language::Pl,
            _ => Language::En,
        }
    }

    pub fn texts(self) -> &'static Texts {
        match self {
            Language::En => &EN,
            Language::Pl => &PL,
        }
    }

    /// Upper-case tag used in file names and titles.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Pl => "PL",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Language::from_tag(s))
    }
}
