//! End-to-end checks: reading, transcoding and round-tripping documents.

use oxevent::{Event, EventCollector, LogEntry, Sink, Status};
use oxturtle::{Reader, Syntax, Writer};

fn events(syntax: Syntax, input: &str) -> Vec<Event> {
    let mut collector = EventCollector::new();
    Reader::new(syntax, &mut collector)
        .with_log(|_: &LogEntry<'_>| {})
        .read_str(input)
        .unwrap();
    collector.events
}

fn transcode(from: Syntax, to: Syntax, input: &str) -> String {
    let mut out = Vec::new();
    let mut writer = Writer::new(to, &mut out);
    Reader::new(from, &mut writer)
        .with_log(|_: &LogEntry<'_>| {})
        .read_str(input)
        .unwrap();
    writer.finish().unwrap();
    drop(writer);
    String::from_utf8(out).unwrap()
}

/// The §"read(write(read(s)))" property: re-reading the writer's output
/// yields the same event stream as the original document.
fn assert_round_trips(syntax: Syntax, input: &str) {
    let first = events(syntax, input);
    let rewritten = transcode(syntax, syntax, input);
    let second = events(syntax, &rewritten);
    assert_eq!(first, second, "round trip of {input:?} via {rewritten:?}");
}

#[test]
fn ntriples_minimum_is_byte_exact() {
    let input = "<http://example.org/s> <http://example.org/p> <http://example.org/o> .\n";
    assert_eq!(transcode(Syntax::NTriples, Syntax::NTriples, input), input);
}

#[test]
fn turtle_abbreviations_survive() {
    let input = "@prefix eg: <http://example.org/> .\neg:s a eg:C ;\n\teg:p \"hi\" .\n";
    assert_eq!(transcode(Syntax::Turtle, Syntax::Turtle, input), input);
}

#[test]
fn turtle_to_ntriples_expands() {
    let input = "@prefix eg: <http://example.org/> .\neg:s a eg:C ; eg:p \"hi\" .";
    assert_eq!(
        transcode(Syntax::Turtle, Syntax::NTriples, input),
        "<http://example.org/s> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/C> .\n\
         <http://example.org/s> <http://example.org/p> \"hi\" .\n"
    );
}

#[test]
fn collection_survives_in_turtle() {
    let input = "<http://e/s> <http://e/p> ( 1 2 3 ) .\n";
    assert_eq!(transcode(Syntax::Turtle, Syntax::Turtle, input), input);
}

#[test]
fn collection_to_ntriples_is_a_chain() {
    let output = transcode(
        Syntax::Turtle,
        Syntax::NTriples,
        "<http://e/s> <http://e/p> ( 1 2 ) .",
    );
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "<http://e/s> <http://e/p> _:b1 .");
    assert_eq!(
        lines[1],
        "_:b1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> ."
    );
    assert!(lines[2].starts_with("_:b1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> _:b2"));
    assert!(lines[4].ends_with("<http://www.w3.org/1999/02/22-rdf-syntax-ns#nil> ."));
}

#[test]
fn long_literal_forms() {
    let input = "<http://e/s> <http://e/p> \"\"\"a\n\"b\"\"\" .\n";
    assert_eq!(transcode(Syntax::Turtle, Syntax::Turtle, input), input);
    assert_eq!(
        transcode(Syntax::Turtle, Syntax::NTriples, input),
        "<http://e/s> <http://e/p> \"a\\n\\\"b\" .\n"
    );
}

#[test]
fn anonymous_nodes_round_trip() {
    assert_round_trips(
        Syntax::Turtle,
        "<http://e/s> <http://e/p> [ <http://e/q> \"v\" ; <http://e/r> [ <http://e/q> 2 ] ] .",
    );
    assert_round_trips(Syntax::Turtle, "[ <http://e/p> \"v\" ] <http://e/q> \"w\" .");
    assert_round_trips(Syntax::Turtle, "[] <http://e/p> [] .");
}

#[test]
fn collections_round_trip() {
    assert_round_trips(Syntax::Turtle, "<http://e/s> <http://e/p> ( 1 ( 2 3 ) ) .");
    assert_round_trips(Syntax::Turtle, "( \"x\" ) <http://e/p> ( ) .");
}

#[test]
fn prefixed_documents_round_trip() {
    assert_round_trips(
        Syntax::Turtle,
        "@prefix eg: <http://example.org/> .\n@prefix o: <http://other.example/ns#> .\neg:s a o:C ; eg:p eg:o , \"lit\"@en , 4.5 .",
    );
}

#[test]
fn trig_graphs_round_trip() {
    assert_round_trips(
        Syntax::TriG,
        "@prefix eg: <http://e/> .\neg:g { eg:s eg:p eg:o . eg:s eg:q \"v\" }\neg:s eg:p eg:r .",
    );
}

#[test]
fn nquads_round_trips() {
    let input = "<http://e/s> <http://e/p> \"o\"@en <http://e/g> .\n_:b <http://e/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n";
    assert_eq!(transcode(Syntax::NQuads, Syntax::NQuads, input), input);
}

#[test]
fn turtle_to_trig_and_back() {
    let input = "@prefix eg: <http://e/> .\neg:s eg:p [ eg:q ( true false ) ] .";
    let trig = transcode(Syntax::Turtle, Syntax::TriG, input);
    assert_eq!(events(Syntax::Turtle, input), events(Syntax::TriG, &trig));
}

#[test]
fn base_relative_output() {
    let mut out = Vec::new();
    let mut writer = Writer::new(Syntax::Turtle, &mut out)
        .with_base_uri("http://a.example/b/")
        .unwrap();
    Reader::new(Syntax::NTriples, &mut writer)
        .read_str("<http://a.example/b/c> <http://a.example/b/p> <http://other.example/x> .\n")
        .unwrap();
    writer.finish().unwrap();
    drop(writer);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "<c> <p> <http://other.example/x> .\n"
    );
}

#[test]
fn document_blank_labels_never_collide_with_generated_ones() {
    let output = transcode(
        Syntax::Turtle,
        Syntax::NTriples,
        "_:b1 <http://e/p> [ <http://e/q> \"v\" ] .",
    );
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "_:Bb1 <http://e/p> _:b1 .");
    assert_eq!(lines[1], "_:b1 <http://e/q> \"v\" .");
}

#[test]
fn sink_errors_stop_the_reader() {
    struct FailingSink;
    impl Sink for FailingSink {
        fn on_event(&mut self, _: &Event) -> Result<(), Status> {
            Err(Status::BadWrite)
        }
    }
    let mut sink = FailingSink;
    assert_eq!(
        Reader::new(Syntax::NTriples, &mut sink)
            .read_str("<http://e/s> <http://e/p> <http://e/o> .\n"),
        Err(Status::BadWrite)
    );
}

#[test]
fn byte_at_a_time_input_matches_paged_input() {
    let input = "@prefix eg: <http://example.org/> .\neg:s eg:p ( 1 2 ) , [ eg:q \"\"\"long\n\"text\"\"\" ] .";
    let mut paged = EventCollector::new();
    Reader::new(Syntax::Turtle, &mut paged)
        .read_str(input)
        .unwrap();
    let mut unbuffered = EventCollector::new();
    Reader::new(Syntax::Turtle, &mut unbuffered)
        .with_block_size(1)
        .read_str(input)
        .unwrap();
    assert_eq!(paged.events, unbuffered.events);
}

#[test]
fn base_directives_round_trip() {
    let input = "@base <http://e/dir/> .\n<a> <b> <c> .\n";
    let rewritten = transcode(Syntax::Turtle, Syntax::Turtle, input);
    assert_eq!(rewritten, input);
    assert_eq!(events(Syntax::Turtle, input), events(Syntax::Turtle, &rewritten));
}

#[test]
fn an_environment_seeds_a_writer() {
    let mut env = oxevent::Env::new();
    env.set_prefix("eg", "http://example.org/").unwrap();
    let mut out = Vec::new();
    let mut writer = Writer::new(Syntax::Turtle, &mut out).with_env(env);
    Reader::new(Syntax::NTriples, &mut writer)
        .read_str("<http://example.org/s> <http://example.org/p> <http://example.org/o> .\n")
        .unwrap();
    writer.finish().unwrap();
    drop(writer);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "@prefix eg: <http://example.org/> .\neg:s eg:p eg:o .\n"
    );
}
