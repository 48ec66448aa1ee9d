//! Station name variants to canonical abbreviations.
//!
//! Riders and feeds spell station names several ways ("12th St",
//! "12th Street / Oakland City Center"). Live departure services key
//! stations by a short abbreviation instead, so the alias map translates.

use std::collections::HashMap;
use std::sync::Arc;

/// Built-in table for BART stations.
const BART_ALIASES: &[(&str, &str)] = &[
    ("12th Street / Oakland City Center", "12th"),
    ("12th St", "12th"),
    ("12th", "12th"),
    ("16th Street / Mission", "16th"),
    ("16th St", "16th"),
    ("16th", "16th"),
    ("19th Street Oakland", "19th"),
    ("19th St", "19th"),
    ("19th", "19th"),
    ("24th Street / Mission", "24th"),
    ("24th St", "24th"),
    ("24th", "24th"),
    ("Antioch", "antc"),
    ("Ashby", "ashb"),
    ("Balboa Park", "balb"),
    ("Balboa", "balb"),
    ("Bay Fair", "bayf"),
    ("Berryessa / North San Jose", "bery"),
    ("Berryessa", "bery"),
    ("Castro Valley", "cast"),
    ("Castro", "cast"),
    ("Civic Center / UN Plaza", "civc"),
    ("Civic Center", "civc"),
    ("Coliseum", "cols"),
    ("Colma", "colm"),
    ("Concord", "conc"),
    ("Daly City", "daly"),
    ("Daly", "daly"),
    ("Downtown Berkeley", "dbrk"),
    ("Downtown", "dbrk"),
    ("Dublin / Pleasanton", "dubl"),
    ("Dublin", "dubl"),
    ("El Cerrito Del Norte", "deln"),
    ("El Cerrito North", "deln"),
    ("El Cerrito Plaza", "plza"),
    ("Embarcadero", "embr"),
    ("Fremont", "frmt"),
    ("Fruitvale", "ftvl"),
    ("Glen Park", "glen"),
    ("Glen", "glen"),
    ("Hayward", "hayw"),
    ("Lafayette", "lafy"),
    ("Lake Merritt", "lake"),
    ("MacArthur", "mcar"),
    ("Millbrae", "mlbr"),
    ("Millbrae (Caltrain Transfer Platform)", "mlbr"),
    ("Milpitas", "mlpt"),
    ("Montgomery Street", "mont"),
    ("Montgomery St", "mont"),
    ("Montgomery", "mont"),
    ("North Berkeley", "nbrk"),
    ("North Concord / Martinez", "ncon"),
    ("North Concord", "ncon"),
    ("Oakland International Airport", "oakl"),
    ("Oakland Airport", "oakl"),
    ("Orinda", "orin"),
    ("Pittsburg / Bay Point", "pitt"),
    ("Pittsburg Bay Point", "pitt"),
    ("Pittsburg Center", "pctr"),
    ("Pittsburg", "pctr"),
    ("Pleasant Hill / Contra Costa Centre", "phil"),
    ("Pleasant Hill", "phil"),
    ("Powell Street", "powl"),
    ("Powell St", "powl"),
    ("Powell", "powl"),
    ("Richmond", "rich"),
    ("Rockridge", "rock"),
    ("San Bruno", "sbrn"),
    ("San Francisco International Airport", "sfia"),
    ("SFO", "sfia"),
    ("San Leandro", "sanl"),
    ("South Hayward", "shay"),
    ("South San Francisco", "ssan"),
    ("Union City", "ucty"),
    ("Walnut Creek", "wcrk"),
    ("Warm Springs / South Fremont", "warm"),
    ("Warm Springs", "warm"),
    ("West Dublin / Pleasanton", "wdub"),
    ("West Dublin", "wdub"),
    ("West Oakland", "woak"),
];

/// Friendly station name → abbreviation.
///
/// Exact spelling wins; otherwise the lookup falls back to a case-insensitive
/// match. The map is configuration: it is never derived from the feed.
#[derive(Clone, Debug, Default)]
pub struct AliasMap {
    exact: HashMap<Arc<str>, Arc<str>>,
    folded: HashMap<String, Arc<str>>,
    /// Folded names, longest first (ties by name)
    longest_first: Vec<(String, Arc<str>)>,
}

impl AliasMap {
    /// The BART station table.
    pub fn bart() -> Self {
        Self::from_pairs(BART_ALIASES.iter().copied())
    }

    /// Build from `(name, abbreviation)` pairs. A later pair overrides an
    /// earlier one with the same name.
    pub fn from_pairs<N, A>(pairs: impl IntoIterator<Item = (N, A)>) -> Self
    where
        N: AsRef<str>,
        A: AsRef<str>,
    {
        let mut map = Self::default();
        for (name, abbreviation) in pairs {
            let abbreviation: Arc<str> = abbreviation.as_ref().into();
            map.folded
                .insert(name.as_ref().to_lowercase(), abbreviation.clone());
            map.exact.insert(name.as_ref().into(), abbreviation);
        }

        map.longest_first = map
            .folded
            .iter()
            .map(|(name, abbreviation)| (name.clone(), abbreviation.clone()))
            .collect();
        map.longest_first.sort_by(|(a, _), (b, _)| {
            b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b))
        });
        map
    }

    pub fn abbreviation(&self, name: &str) -> Option<&Arc<str>> {
        self.exact
            .get(name)
            .or_else(|| self.folded.get(&name.to_lowercase()))
    }

    /// Abbreviation for a trip headsign such as "Daly City / SFO".
    ///
    /// An exact match on the whole headsign wins; otherwise the longest
    /// known name contained in it, ignoring case, decides.
    pub fn headsign_abbreviation(&self, headsign: &str) -> Option<&Arc<str>> {
        if let Some(abbreviation) = self.exact.get(headsign) {
            return Some(abbreviation);
        }
        let folded = headsign.to_lowercase();
        self.longest_first
            .iter()
            .find(|(name, _)| folded.contains(name.as_str()))
            .map(|(_, abbreviation)| abbreviation)
    }

    /// Exact-spelling lookup, as used when stamping feed stops.
    pub fn exact(&self, name: &str) -> Option<&Arc<str>> {
        self.exact.get(name)
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}
