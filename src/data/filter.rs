use super::model::{ConditionChoice, Conditions, PositionType, RowRecord};

// ---------------------------------------------------------------------------
// Selection: the position type and four conditions currently chosen
// ---------------------------------------------------------------------------

/// What the user has picked. Starts at the bidirectional position with every
/// condition on its first choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub position: PositionType,
    pub conditions: Conditions,
}

impl Selection {
    pub fn select_position(&mut self, position: PositionType) {
        self.position = position;
    }

    pub fn select_condition(&mut self, choice: ConditionChoice) {
        self.conditions.set(choice);
    }

    /// Exact five-way equality against a row.
    pub fn matches(&self, row: &RowRecord) -> bool {
        row.position_type == self.position && row.conditions == self.conditions
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// A `(name, value)` pair handed to the charts and the table.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub name: String,
    pub value: f64,
}

/// Keep every row that matches `selection`, in dataset order, and reduce it
/// to its metric name and value. Duplicates are kept as separate points.
pub fn filter_and_project(rows: &[RowRecord], selection: &Selection) -> Vec<MetricPoint> {
    rows.iter()
        .filter(|row| selection.matches(row))
        .map(|row| MetricPoint {
            name: row.metric.clone(),
            value: row.value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{
        Category, ConditionKey, NumPvsN, NumsigRatio, SignalT, TMinus1VsT,
    };

    fn record(position_type: PositionType, conditions: Conditions, metric: &str, value: f64) -> RowRecord {
        RowRecord {
            position_type,
            conditions,
            metric: metric.to_string(),
            value,
        }
    }

    /// Every position × condition combination.
    fn all_selections() -> Vec<Selection> {
        let mut out = Vec::new();
        for &position in PositionType::ALL {
            for &signal_t in SignalT::ALL {
                for &numsig_ratio in NumsigRatio::ALL {
                    for &num_pvs_n in NumPvsN::ALL {
                        for &t_minus1_vs_t in TMinus1VsT::ALL {
                            out.push(Selection {
                                position,
                                conditions: Conditions {
                                    signal_t,
                                    numsig_ratio,
                                    num_pvs_n,
                                    t_minus1_vs_t,
                                },
                            });
                        }
                    }
                }
            }
        }
        out
    }

    /// Two metrics for every combination, with values encoding the index.
    fn full_dataset() -> Vec<RowRecord> {
        all_selections()
            .into_iter()
            .enumerate()
            .flat_map(|(i, s)| {
                [
                    record(s.position, s.conditions, "winRate", i as f64),
                    record(s.position, s.conditions, "sharpe", i as f64 + 0.5),
                ]
            })
            .collect()
    }

    #[test]
    fn winrate_scenario() {
        let long_positive = Conditions {
            signal_t: SignalT::Positive,
            ..Conditions::default()
        };
        let rows = vec![
            record(PositionType::Long, long_positive, "winRate", 0.62),
            record(PositionType::Short, long_positive, "winRate", 0.41),
        ];
        let selection = Selection {
            position: PositionType::Long,
            conditions: long_positive,
        };
        assert_eq!(
            filter_and_project(&rows, &selection),
            vec![MetricPoint {
                name: "winRate".into(),
                value: 0.62
            }]
        );
    }

    #[test]
    fn returns_exactly_the_matching_rows() {
        let rows = full_dataset();
        for selection in all_selections() {
            let expected: Vec<MetricPoint> = rows
                .iter()
                .filter(|r| {
                    r.position_type == selection.position
                        && ConditionKey::ALL
                            .iter()
                            .all(|&k| r.conditions.get(k) == selection.conditions.get(k))
                })
                .map(|r| MetricPoint {
                    name: r.metric.clone(),
                    value: r.value,
                })
                .collect();
            let got = filter_and_project(&rows, &selection);
            assert_eq!(got.len(), 2);
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn output_preserves_dataset_order() {
        let mut rows = full_dataset();
        rows.reverse();
        let selection = Selection::default();
        let got = filter_and_project(&rows, &selection);
        let names: Vec<&str> = got.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["sharpe", "winRate"]);
    }

    #[test]
    fn duplicates_are_all_rendered() {
        let rows = vec![
            record(PositionType::Bidirectional, Conditions::default(), "winRate", 0.1),
            record(PositionType::Bidirectional, Conditions::default(), "winRate", 0.2),
        ];
        let got = filter_and_project(&rows, &Selection::default());
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].value, 0.1);
        assert_eq!(got[1].value, 0.2);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let rows = full_dataset();
        let selection = Selection {
            position: PositionType::Short,
            ..Selection::default()
        };
        assert_eq!(
            filter_and_project(&rows, &selection),
            filter_and_project(&rows, &selection)
        );
    }

    #[test]
    fn selecting_and_reverting_restores_output() {
        let rows = full_dataset();
        let mut selection = Selection::default();
        let before = filter_and_project(&rows, &selection);

        selection.select_condition(ConditionChoice::TMinus1VsT(TMinus1VsT::Different));
        assert_ne!(filter_and_project(&rows, &selection), before);
        selection.select_condition(ConditionChoice::TMinus1VsT(TMinus1VsT::Same));
        assert_eq!(filter_and_project(&rows, &selection), before);

        selection.select_position(PositionType::Long);
        assert_ne!(filter_and_project(&rows, &selection), before);
        selection.select_position(PositionType::Bidirectional);
        assert_eq!(filter_and_project(&rows, &selection), before);
    }

    #[test]
    fn empty_dataset_gives_empty_result() {
        assert!(filter_and_project(&[], &Selection::default()).is_empty());
    }

    #[test]
    fn default_selection_without_matching_rows_is_empty() {
        let rows = vec![record(
            PositionType::Long,
            Conditions::default(),
            "winRate",
            0.5,
        )];
        assert!(filter_and_project(&rows, &Selection::default()).is_empty());
    }
}
