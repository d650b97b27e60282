//! Demo ballot used until elections are loaded from a real source.

use evote_ledger_core::{Ballot, Candidate};

pub fn city_council_ballot() -> Ballot {
    let candidate = |id: &str, name: &str, party: &str, description: &str| Candidate {
        id: id.to_owned(),
        name: name.to_owned(),
        party: party.to_owned(),
        description: description.to_owned(),
    };
    Ballot {
        election_id: "1".to_owned(),
        title: "City Council Election 2025".to_owned(),
        candidates: vec![
            candidate(
                "1",
                "Jane Smith",
                "Progressive Party",
                "Focused on environmental sustainability and social justice",
            ),
            candidate(
                "2",
                "John Doe",
                "Liberty Party",
                "Advocating for economic growth and individual freedoms",
            ),
            candidate(
                "3",
                "Alex Johnson",
                "Unity Coalition",
                "Working to bridge divides and find common ground solutions",
            ),
            candidate(
                "4",
                "Maria Garcia",
                "Future Alliance",
                "Promoting innovation, technology, and education reform",
            ),
            candidate(
                "5",
                "Sam Wilson",
                "Independent",
                "Running as an independent with focus on local community needs",
            ),
        ],
    }
}
