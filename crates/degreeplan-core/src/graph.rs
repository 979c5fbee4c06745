//! Prerequisite relationships among the courses on the board.
//!
//! The graph is rebuilt from scratch whenever the visible course set or the
//! prerequisite data changes; nothing in it is ever updated in place.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use serde::Serialize;

use crate::models::PrereqTree;

/// Direct relations of one course, by course code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CourseRelationship {
    pub prerequisites: BTreeSet<String>,
    pub postrequisites: BTreeSet<String>,
    /// Not derivable from prerequisite logic; always empty for now
    pub corequisites: BTreeSet<String>,
}

/// Everything to highlight while a course is hovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub course: String,
    /// Direct and transitive prerequisites
    pub prerequisites: BTreeSet<String>,
    /// Direct and transitive postrequisites
    pub postrequisites: BTreeSet<String>,
}

impl Highlight {
    pub fn contains(&self, code: &str) -> bool {
        self.prerequisites.contains(code) || self.postrequisites.contains(code)
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Prerequisites,
    Postrequisites,
}

/// Course code → relationship sets, one entry per visible course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationshipGraph {
    relationships: BTreeMap<String, CourseRelationship>,
}

impl RelationshipGraph {
    /// Builds the graph for the visible `(numeric id, course code)` pairs.
    ///
    /// Prerequisite logic is flattened: any course referenced anywhere in a
    /// course's tree counts as a prerequisite. Back-references are recorded
    /// only on courses that are visible.
    pub fn build(visible: &[(u64, String)], prerequisites: &HashMap<u64, PrereqTree>) -> Self {
        let mut relationships: BTreeMap<String, CourseRelationship> = visible
            .iter()
            .map(|(_, code)| (code.clone(), CourseRelationship::default()))
            .collect();

        for (id, code) in visible {
            let Some(tree) = prerequisites.get(id) else {
                continue;
            };
            let mut direct = tree.flatten();
            direct.remove(code);

            for prerequisite in &direct {
                if let Some(entry) = relationships.get_mut(prerequisite) {
                    entry.postrequisites.insert(code.clone());
                }
            }
            if let Some(entry) = relationships.get_mut(code) {
                entry.prerequisites.extend(direct);
            }
        }

        log::debug!("Built relationship graph for {} course(s)", relationships.len());
        Self { relationships }
    }

    pub fn get(&self, code: &str) -> Option<&CourseRelationship> {
        self.relationships.get(code)
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CourseRelationship)> {
        self.relationships.iter()
    }

    /// All recursive prerequisites and postrequisites of `code`, each
    /// direction followed independently. Cycles terminate and the course
    /// itself is never included.
    pub fn highlight(&self, code: &str) -> Highlight {
        Highlight {
            course: code.to_string(),
            prerequisites: self.closure(code, Direction::Prerequisites),
            postrequisites: self.closure(code, Direction::Postrequisites),
        }
    }

    fn closure(&self, start: &str, direction: Direction) -> BTreeSet<String> {
        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut frontier: VecDeque<&str> = VecDeque::from([start]);

        while let Some(code) = frontier.pop_front() {
            let Some(entry) = self.relationships.get(code) else {
                continue;
            };
            let next = match direction {
                Direction::Prerequisites => &entry.prerequisites,
                Direction::Postrequisites => &entry.postrequisites,
            };
            for related in next {
                if related != start && visited.insert(related.clone()) {
                    frontier.push_back(related);
                }
            }
        }
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(code: &str) -> PrereqTree {
        PrereqTree::Course(code.to_string())
    }

    fn visible(codes: &[&str]) -> Vec<(u64, String)> {
        codes
            .iter()
            .enumerate()
            .map(|(i, code)| (i as u64 + 1, code.to_string()))
            .collect()
    }

    #[test]
    fn test_transitive_chain() {
        // B requires A, C requires B
        let courses = visible(&["CS 1", "CS 2", "CS 3"]);
        let prereqs = HashMap::from([(2, leaf("CS 1")), (3, leaf("CS 2"))]);
        let graph = RelationshipGraph::build(&courses, &prereqs);

        let hover_c = graph.highlight("CS 3");
        assert_eq!(
            hover_c.prerequisites,
            BTreeSet::from(["CS 1".to_string(), "CS 2".to_string()])
        );
        assert!(hover_c.postrequisites.is_empty());

        let hover_a = graph.highlight("CS 1");
        assert_eq!(
            hover_a.postrequisites,
            BTreeSet::from(["CS 2".to_string(), "CS 3".to_string()])
        );
        assert!(hover_a.prerequisites.is_empty());
    }

    #[test]
    fn test_cycles_terminate_without_self() {
        let courses = visible(&["CS 1", "CS 2"]);
        let prereqs = HashMap::from([(1, leaf("CS 2")), (2, leaf("CS 1"))]);
        let graph = RelationshipGraph::build(&courses, &prereqs);

        let hover = graph.highlight("CS 1");
        assert_eq!(hover.prerequisites, BTreeSet::from(["CS 2".to_string()]));
        assert_eq!(hover.postrequisites, BTreeSet::from(["CS 2".to_string()]));
        assert!(!hover.contains("CS 1"));
    }

    #[test]
    fn test_self_reference_is_ignored() {
        let courses = visible(&["CS 1"]);
        let prereqs = HashMap::from([(1, leaf("CS 1"))]);
        let graph = RelationshipGraph::build(&courses, &prereqs);
        assert!(graph.get("CS 1").unwrap().prerequisites.is_empty());
    }

    #[test]
    fn test_and_or_logic_is_flattened() {
        let courses = visible(&["CS 1", "CS 2", "CS 3"]);
        let tree = PrereqTree::All {
            and: vec![
                leaf("CS 1"),
                PrereqTree::Any {
                    or: vec![leaf("CS 2"), leaf("MATH 9")],
                },
            ],
        };
        let prereqs = HashMap::from([(3, tree)]);
        let graph = RelationshipGraph::build(&courses, &prereqs);

        let entry = graph.get("CS 3").unwrap();
        assert_eq!(entry.prerequisites.len(), 3);
        assert!(entry.prerequisites.contains("MATH 9"));
        assert!(entry.corequisites.is_empty());
        // Back-references only land on visible courses
        assert!(graph.get("MATH 9").is_none());
        assert!(graph.get("CS 2").unwrap().postrequisites.contains("CS 3"));
    }

    #[test]
    fn test_every_visible_course_has_an_entry() {
        let courses = visible(&["CS 1", "CS 2"]);
        let graph = RelationshipGraph::build(&courses, &HashMap::new());
        assert_eq!(graph.len(), 2);
        assert!(graph.iter().all(|(_, r)| *r == CourseRelationship::default()));
        assert!(graph.highlight("CS 9").prerequisites.is_empty());
    }
}
