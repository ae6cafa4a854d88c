//! The `dot` module contains the conversion of the automata to graphviz dot
//! format. The functions in this module are used for testing and debugging
//! purposes.

use std::io::Write;

use dot_writer::{Attributes, DotWriter, RankDirection};

use super::{dfa::Dfa, ids::StateIDBase, nfa::Nfa, StateID};

/// Render an NFA to graphviz dot format.
#[allow(dead_code)]
pub(crate) fn nfa_render<W: Write>(nfa: &Nfa, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for id in 0..nfa.node_count() {
        let node = nfa.node(id);
        let source_id = {
            let mut source_node = digraph.node_auto();
            let mut text = id.to_string();
            if !node.accepts().is_empty() {
                let labels: Vec<String> =
                    node.accepts().iter().map(|a| a.to_string()).collect();
                text = format!("{} [{}]", text, labels.join(","));
            }
            source_node.set_label(&text);
            if StateID::new(id as StateIDBase) == nfa.start() {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Blue)
                    .set_pen_width(3.0);
            }
            if !node.accepts().is_empty() {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Red)
                    .set_pen_width(3.0);
            }
            source_node.id()
        };
        if let Some(consume) = node.consume() {
            let letters: Vec<String> = consume.letters.iter().map(|l| l.to_string()).collect();
            digraph
                .edge(
                    source_id.clone(),
                    &format!("node_{}", consume.next.as_usize()),
                )
                .attributes()
                .set_label(&format!("{{{}}}", letters.join(",")));
        }
        for epsilon in node.epsilons() {
            digraph
                .edge(source_id.clone(), &format!("node_{}", epsilon.as_usize()))
                .attributes()
                .set_label("ε");
        }
    }
}

/// Render a DFA to graphviz dot format.
#[allow(dead_code)]
pub(crate) fn dfa_render<W: Write>(dfa: &Dfa, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for state in 0..dfa.state_count() {
        let state_id = StateID::new(state as StateIDBase);
        let accepts = dfa.accepts_at(state_id);
        let source_id = {
            let mut source_node = digraph.node_auto();
            let mut text = state.to_string();
            if !accepts.is_empty() {
                let labels: Vec<String> = accepts.iter().map(|a| a.to_string()).collect();
                text = format!("{} [{}]", text, labels.join(","));
            }
            source_node.set_label(&text);
            if state == 0 {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Blue)
                    .set_pen_width(3.0);
            } else if !accepts.is_empty() {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Red)
                    .set_pen_width(3.0);
            }
            source_node.id()
        };
        for letter in 0..dfa.alphabet_size() {
            let target = dfa.target(state_id, letter);
            digraph
                .edge(
                    source_id.clone(),
                    &format!("node_{}", target.as_usize()),
                )
                .attributes()
                .set_label(&letter.to_string());
        }
    }
}
