//! Canned solve result served in mock mode, so the page can be exercised
//! without a real solver behind it.

use crate::client::SolveService;
use crate::controller::Ticket;
use crate::error::SolveError;
use crate::model::{
    InteractiveClue, Role, Solution, SolveResult, WordMapping, WordRoleEntry, WordplayComponent,
};
use once_cell::sync::Lazy;
use tracing::debug;

pub const MOCK_CLUE: &str = "Initially irritated, raised uproar about drink that's tasteless";

struct Piece {
    position: usize,
    role: Role,
    wordplay_type: &'static str,
    description: &'static str,
    result: Option<&'static str>,
    /// Index into `PIECES` of the indicator acting on this piece.
    targeted_by: Option<usize>,
}

const PIECES: [Piece; 8] = [
    Piece {
        position: 0,
        role: Role::Indicator,
        wordplay_type: "selection",
        description: "Indicates selecting the first letter",
        result: None,
        targeted_by: None,
    },
    Piece {
        position: 1,
        role: Role::Target,
        wordplay_type: "selection",
        description: "First letter is selected",
        result: Some("I"),
        targeted_by: Some(0),
    },
    Piece {
        position: 2,
        role: Role::Indicator,
        wordplay_type: "reversal",
        description: "Indicates reversal in a down clue",
        result: None,
        targeted_by: None,
    },
    Piece {
        position: 3,
        role: Role::Target,
        wordplay_type: "synonym",
        description: "DIN is a synonym for 'uproar' and is targeted by a reversal indicator",
        result: Some("NID"),
        targeted_by: Some(2),
    },
    Piece {
        position: 4,
        role: Role::Indicator,
        wordplay_type: "container",
        description: "Container indicator - something goes around",
        result: None,
        targeted_by: None,
    },
    Piece {
        position: 5,
        role: Role::Target,
        wordplay_type: "synonym",
        description: "SIP is a synonym for 'drink' and is targeted by a container indicator",
        result: Some("NSIPID"),
        targeted_by: Some(4),
    },
    Piece {
        position: 6,
        role: Role::Indicator,
        wordplay_type: "link word",
        description: "Links the wordplay to the definition",
        result: None,
        targeted_by: None,
    },
    Piece {
        position: 7,
        role: Role::Definition,
        wordplay_type: "definition",
        description: "INSIPID is a synonym for 'tasteless'",
        result: Some("INSIPID"),
        targeted_by: None,
    },
];

static MOCK_RESULT: Lazy<SolveResult> = Lazy::new(build_mock_result);

/// The canned result for [`MOCK_CLUE`].
pub fn mock_result() -> SolveResult {
    MOCK_RESULT.clone()
}

/// Answers every ticket with [`mock_result`] without touching the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSolver;

impl SolveService for MockSolver {
    async fn solve(&self, ticket: &Ticket) -> Result<SolveResult, SolveError> {
        debug!(generation = ticket.generation, "Serving canned result");
        Ok(mock_result())
    }
}

fn build_mock_result() -> SolveResult {
    let words: Vec<&str> = MOCK_CLUE.split_whitespace().collect();
    let word = |position: usize| words.get(position).copied().unwrap_or_default();

    let components_for = |indices: &[usize]| -> Vec<WordplayComponent> {
        indices
            .iter()
            .filter_map(|&index| {
                let piece = &PIECES[index];
                (piece.role == Role::Indicator).then(|| {
                    let target = PIECES
                        .iter()
                        .find(|candidate| candidate.targeted_by == Some(index));
                    WordplayComponent {
                        indicator: word(piece.position).to_string(),
                        wordplay_type: piece.wordplay_type.to_string(),
                        target: target.map(|t| word(t.position).to_string()),
                        result: target.and_then(|t| t.result).map(str::to_string),
                        description: Some(piece.description.to_string()),
                    }
                })
            })
            .collect()
    };

    let word_mapping: WordMapping = PIECES
        .iter()
        .enumerate()
        .map(|(index, piece)| {
            let related_positions = match piece.targeted_by {
                Some(indicator) => vec![PIECES[indicator].position],
                None => PIECES
                    .iter()
                    .filter(|candidate| candidate.targeted_by == Some(index))
                    .map(|candidate| candidate.position)
                    .collect(),
            };
            let entry = WordRoleEntry {
                role: piece.role,
                kind: None,
                wordplay_type: Some(piece.wordplay_type.to_string()),
                description: piece.description.to_string(),
                result: piece.result.map(str::to_string),
                related_positions,
            };
            (piece.position, entry)
        })
        .collect();

    let rejected = Solution {
        solution: Some("INSIPID".to_string()),
        definition: Some("tasteless".to_string()),
        wordplay_components: vec![WordplayComponent {
            indicator: "irritated,".to_string(),
            wordplay_type: "anagram".to_string(),
            target: Some("raised".to_string()),
            result: Some("AIDERS".to_string()),
            description: Some("Indicator of an anagram".to_string()),
        }],
    };

    SolveResult {
        confidence: Some(0.9),
        complete_solution: Solution {
            solution: Some("INSIPID".to_string()),
            definition: Some("tasteless".to_string()),
            wordplay_components: components_for(&[0, 2, 4, 6]),
        },
        attempted_solutions: vec![
            Solution {
                solution: Some("INSIPID".to_string()),
                definition: Some("tasteless".to_string()),
                wordplay_components: components_for(&[0, 2]),
            },
            rejected,
        ],
        interactive_clue: Some(InteractiveClue {
            original_clue: MOCK_CLUE.to_string(),
            word_mapping,
        }),
        reasoning: Some(
            "**I**nitially *irritated* gives I. *Uproar* is DIN, *raised* to NID. \
             SIP (*drink*) goes inside: N(SIP)ID. Together: I + NSIPID = **INSIPID**, \
             which means *tasteless*."
                .to_string(),
        ),
    }
}
