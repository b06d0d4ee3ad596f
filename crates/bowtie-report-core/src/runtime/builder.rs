// crates/bowtie-report-core/src/runtime/builder.rs
// ============================================================================
// Module: Report Builder
// Description: Folds decoded run events into an immutable report.
// Purpose: Enforce referential integrity between cases and results.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! [`ReportBuilder`] consumes positioned events in stream order. Case sequence
//! numbers are assigned from zero in declaration order; result records name
//! the sequence number written in the case record and are translated to the
//! assigned one. Structural violations abort the build with a [`BuildError`]
//! that names the offending record, case, and implementation.
//!
//! ## Invariants
//! - Every stored result sequence has exactly one entry per test of its case.
//! - At most one result record is accepted per (implementation, case) pair.
//! - Nothing is accepted after the completion marker.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::Case;
use crate::core::CaseDefinition;
use crate::core::CaseResult;
use crate::core::CaseResultRecord;
use crate::core::CaseSeq;
use crate::core::Implementation;
use crate::core::ImplementationId;
use crate::core::ImplementationMetadata;
use crate::core::ImplementationResults;
use crate::core::PositionedEvent;
use crate::core::RecordKind;
use crate::core::RecordPosition;
use crate::core::RecordedOutcome;
use crate::core::Report;
use crate::core::RunCompletion;
use crate::core::RunEvent;
use crate::core::RunInfo;
use crate::core::RunStart;
use crate::core::Test;
use crate::core::TestOutcome;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Structural violations that abort report construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A record other than run start arrived before the run started.
    #[error("{position}: {kind} record before run start")]
    MissingRunStart {
        /// Offending record.
        position: RecordPosition,
        /// Kind of the offending record.
        kind: RecordKind,
    },
    /// A second run-start record arrived.
    #[error("{position}: duplicate run start")]
    DuplicateRunStart {
        /// Offending record.
        position: RecordPosition,
    },
    /// A case sequence number was declared twice.
    #[error("{position}: case {seq} declared twice")]
    DuplicateCase {
        /// Offending record.
        position: RecordPosition,
        /// Declared sequence number.
        seq: u64,
    },
    /// A result referenced a case that has not been declared.
    #[error("{position}: result from {implementation} references undeclared case {seq}")]
    OutOfOrderReference {
        /// Offending record.
        position: RecordPosition,
        /// Reporting implementation.
        implementation: ImplementationId,
        /// Referenced sequence number.
        seq: u64,
    },
    /// A result came from an implementation the run did not declare.
    #[error("{position}: result for case {seq} from undeclared implementation {implementation}")]
    UnknownImplementation {
        /// Offending record.
        position: RecordPosition,
        /// Reporting implementation.
        implementation: ImplementationId,
        /// Referenced sequence number.
        seq: u64,
    },
    /// An implementation reported on the same case twice.
    #[error("{position}: second result from {implementation} for case {seq}")]
    DuplicateResult {
        /// Offending record.
        position: RecordPosition,
        /// Reporting implementation.
        implementation: ImplementationId,
        /// Referenced sequence number.
        seq: u64,
    },
    /// A result sequence did not match the case's test count.
    #[error(
        "{position}: {implementation} reported {actual} results for case {seq}, which declares \
         {expected} tests"
    )]
    ResultLengthMismatch {
        /// Offending record.
        position: RecordPosition,
        /// Reporting implementation.
        implementation: ImplementationId,
        /// Referenced sequence number.
        seq: u64,
        /// Tests declared by the case.
        expected: usize,
        /// Results carried by the record.
        actual: usize,
    },
    /// A record arrived after the completion marker.
    #[error("{position}: {kind} record after run completion")]
    RecordAfterCompletion {
        /// Offending record.
        position: RecordPosition,
        /// Kind of the offending record.
        kind: RecordKind,
    },
}

impl BuildError {
    /// Returns the position of the offending record.
    #[must_use]
    pub const fn position(&self) -> RecordPosition {
        match self {
            Self::MissingRunStart {
                position,
                ..
            }
            | Self::DuplicateRunStart {
                position,
            }
            | Self::DuplicateCase {
                position,
                ..
            }
            | Self::OutOfOrderReference {
                position,
                ..
            }
            | Self::UnknownImplementation {
                position,
                ..
            }
            | Self::DuplicateResult {
                position,
                ..
            }
            | Self::ResultLengthMismatch {
                position,
                ..
            }
            | Self::RecordAfterCompletion {
                position,
                ..
            } => *position,
        }
    }

    /// Returns the declared case sequence number involved, when any.
    #[must_use]
    pub const fn seq(&self) -> Option<u64> {
        match self {
            Self::DuplicateCase {
                seq,
                ..
            }
            | Self::OutOfOrderReference {
                seq,
                ..
            }
            | Self::UnknownImplementation {
                seq,
                ..
            }
            | Self::DuplicateResult {
                seq,
                ..
            }
            | Self::ResultLengthMismatch {
                seq,
                ..
            } => Some(*seq),
            Self::MissingRunStart {
                ..
            }
            | Self::DuplicateRunStart {
                ..
            }
            | Self::RecordAfterCompletion {
                ..
            } => None,
        }
    }

    /// Returns the implementation involved, when any.
    #[must_use]
    pub const fn implementation(&self) -> Option<&ImplementationId> {
        match self {
            Self::OutOfOrderReference {
                implementation,
                ..
            }
            | Self::UnknownImplementation {
                implementation,
                ..
            }
            | Self::DuplicateResult {
                implementation,
                ..
            }
            | Self::ResultLengthMismatch {
                implementation,
                ..
            } => Some(implementation),
            Self::MissingRunStart {
                ..
            }
            | Self::DuplicateRunStart {
                ..
            }
            | Self::DuplicateCase {
                ..
            }
            | Self::RecordAfterCompletion {
                ..
            } => None,
        }
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Implementation state accumulated during the fold.
#[derive(Debug, Clone)]
struct PendingImplementation {
    /// Metadata from the run-start record.
    metadata: ImplementationMetadata,
    /// Results accepted so far.
    results: ImplementationResults,
}

/// Incremental report builder.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    /// Run metadata, set by the run-start record.
    run: Option<RunInfo>,
    /// Declared implementations keyed by identifier.
    implementations: BTreeMap<ImplementationId, PendingImplementation>,
    /// Cases in declaration order.
    cases: Vec<Case>,
    /// Declared sequence numbers mapped to assigned ones.
    declared: BTreeMap<u64, CaseSeq>,
    /// Completion marker, once seen.
    completion: Option<RunCompletion>,
}

impl ReportBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] on any structural violation. The builder should
    /// be discarded after an error.
    pub fn apply(&mut self, positioned: PositionedEvent) -> Result<(), BuildError> {
        let PositionedEvent {
            position,
            event,
        } = positioned;
        let kind = event.kind();
        if self.completion.is_some() {
            return Err(BuildError::RecordAfterCompletion {
                position,
                kind,
            });
        }
        match event {
            RunEvent::RunStarted(start) => self.start(position, start),
            _ if self.run.is_none() => Err(BuildError::MissingRunStart {
                position,
                kind,
            }),
            RunEvent::CaseDefined(definition) => self.define_case(position, definition),
            RunEvent::CaseResultRecorded(record) => self.record_result(position, record),
            RunEvent::RunCompleted(completion) => {
                self.completion = Some(completion);
                Ok(())
            }
        }
    }

    /// Finalizes the report.
    ///
    /// A stream without a run-start record yields an empty report.
    #[must_use]
    pub fn finish(self) -> Report {
        let implementations = self
            .implementations
            .into_iter()
            .map(|(id, pending)| Implementation {
                id,
                metadata: pending.metadata,
                results: pending.results,
            })
            .collect();
        Report::new(self.run.unwrap_or_default(), self.cases, implementations, self.completion)
    }

    /// Applies a run-start record.
    fn start(&mut self, position: RecordPosition, start: RunStart) -> Result<(), BuildError> {
        if self.run.is_some() {
            return Err(BuildError::DuplicateRunStart {
                position,
            });
        }
        self.implementations = start
            .implementations
            .into_iter()
            .map(|(id, metadata)| {
                (
                    id,
                    PendingImplementation {
                        metadata,
                        results: ImplementationResults::default(),
                    },
                )
            })
            .collect();
        self.run = Some(RunInfo {
            dialect_uri: start.dialect,
            bowtie_version: start.bowtie_version,
            started: start.started,
            metadata: start.metadata,
        });
        Ok(())
    }

    /// Applies a case-definition record.
    fn define_case(
        &mut self,
        position: RecordPosition,
        definition: CaseDefinition,
    ) -> Result<(), BuildError> {
        let index = u64::try_from(self.cases.len()).unwrap_or(u64::MAX);
        let declared = match definition.seq {
            Some(seq) if self.declared.contains_key(&seq) => {
                return Err(BuildError::DuplicateCase {
                    position,
                    seq,
                });
            }
            Some(seq) => seq,
            None => self.next_unused(index),
        };
        let assigned = CaseSeq::new(index);
        self.declared.insert(declared, assigned);
        self.cases.push(Case::from_body(assigned, definition.case));
        Ok(())
    }

    /// Returns the first declared number at or after `start` not yet taken.
    fn next_unused(&self, start: u64) -> u64 {
        let mut candidate = start;
        while self.declared.contains_key(&candidate) {
            candidate = candidate.saturating_add(1);
        }
        candidate
    }

    /// Applies a result record.
    fn record_result(
        &mut self,
        position: RecordPosition,
        record: CaseResultRecord,
    ) -> Result<(), BuildError> {
        let CaseResultRecord {
            implementation,
            seq,
            outcome,
        } = record;
        let Some(pending) = self.implementations.get_mut(&implementation) else {
            return Err(BuildError::UnknownImplementation {
                position,
                implementation,
                seq,
            });
        };
        let case = self
            .declared
            .get(&seq)
            .and_then(|assigned| usize::try_from(assigned.get()).ok())
            .and_then(|index| self.cases.get(index));
        let Some(case) = case else {
            return Err(BuildError::OutOfOrderReference {
                position,
                implementation,
                seq,
            });
        };
        if pending.results.covers(case.seq) {
            return Err(BuildError::DuplicateResult {
                position,
                implementation,
                seq,
            });
        }

        match outcome {
            RecordedOutcome::Tests {
                outcomes,
                expected,
            } => {
                if outcomes.len() != case.tests.len() {
                    return Err(BuildError::ResultLengthMismatch {
                        position,
                        implementation,
                        seq,
                        expected: case.tests.len(),
                        actual: outcomes.len(),
                    });
                }
                let fallback = expected.unwrap_or_default();
                let results = outcomes
                    .into_iter()
                    .zip(&case.tests)
                    .enumerate()
                    .map(|(index, (outcome, test))| {
                        classify(outcome, test, fallback.get(index).copied().flatten())
                    })
                    .collect();
                pending.results.insert_results(case.seq, results);
            }
            RecordedOutcome::CaseErrored(error) => {
                pending.results.insert_error(case.seq, error);
            }
            RecordedOutcome::CaseSkipped {
                message,
            } => {
                let results = case
                    .tests
                    .iter()
                    .map(|_| CaseResult::Skipped {
                        message: message.clone(),
                    })
                    .collect();
                pending.results.insert_results(case.seq, results);
            }
        }
        Ok(())
    }
}

/// Turns one recorded outcome into a result, using the test's own
/// expectation first and the record's fallback second.
fn classify(outcome: TestOutcome, test: &Test, fallback: Option<bool>) -> CaseResult {
    match outcome {
        TestOutcome::Verdict {
            valid,
        } => CaseResult::from_verdict(valid, test.valid.or(fallback)),
        TestOutcome::Skipped {
            message,
        } => CaseResult::Skipped {
            message,
        },
        TestOutcome::Errored {
            message,
        } => CaseResult::Errored {
            message,
        },
    }
}
