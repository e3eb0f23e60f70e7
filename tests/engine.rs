mod common;

use common::{Call, Known, RecordingHost};
use livespell::{
    CheckState, EngineOptions, MisspellingRange, PendingDictionary, SpellCheckEngine,
    TokenizerPolicy,
};
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn attach(host: &RecordingHost, dictionary: Rc<Known>) -> SpellCheckEngine<RecordingHost> {
    SpellCheckEngine::new(host.clone(), dictionary, EngineOptions::default()).unwrap()
}

fn hello_world() -> Rc<Known> {
    Rc::new(Known::new(&["hello", "world", "the", "cat"]))
}

#[test]
fn test_helo_wrold_end_to_end() {
    let host = RecordingHost::new(&["Helo wrold"]);
    let engine = attach(&host, hello_world());
    engine.enable();

    assert_eq!(
        host.created(),
        vec![MisspellingRange::new(0, 0, 4), MisspellingRange::new(0, 5, 10)]
    );
    assert_eq!(host.count(|c| *c == Call::SetIndicator(0)), 1);
    assert_eq!(host.count(|c| matches!(c, Call::SetIndicator(_))), 1);
    assert_eq!(engine.state().active_handles.len(), 2);

    host.take_calls();
    host.edit(&["Hello world"]);

    assert_eq!(host.count(|c| matches!(c, Call::Remove(_))), 2);
    assert_eq!(host.count(|c| matches!(c, Call::Create(..))), 0);
    assert_eq!(host.count(|c| matches!(c, Call::SetIndicator(_))), 0);
    assert!(engine.state().active_handles.is_empty());
    assert_eq!(host.live_markers(), 0);
}

#[test]
fn test_known_words_produce_nothing() {
    let host = RecordingHost::new(&["hello world", "", "The cat"]);
    let engine = attach(&host, hello_world());
    engine.enable();

    assert!(engine.flagged().is_empty());
    assert!(host.created().is_empty());
    assert_eq!(host.count(|c| matches!(c, Call::SetIndicator(_))), 0);
}

#[test]
fn test_ranges_stay_in_bounds_and_apart() {
    let lines = [
        "naïve teh wrold",
        "fooBarBaz qux_quux 42abc",
        "",
        "Ünïcode zzz",
    ];
    let host = RecordingHost::new(&lines);
    let engine = attach(&host, hello_world());
    engine.enable();

    let flagged = engine.flagged();
    assert!(!flagged.is_empty());
    for range in &flagged {
        let width = lines[range.line].chars().count();
        assert!(range.start_column < range.end_column);
        assert!(range.end_column <= width, "{:?} past end of line", range);
    }
    for pair in flagged.windows(2) {
        if pair[0].line == pair[1].line {
            assert!(pair[0].end_column <= pair[1].start_column);
        }
    }
}

#[test]
fn test_refresh_is_idempotent() {
    let host = RecordingHost::new(&["teh cat sat", "wrold"]);
    let engine = attach(&host, hello_world());
    engine.enable();
    let first = engine.flagged();

    engine.notify_content_changed();
    assert_eq!(engine.flagged(), first);
    assert!(!engine.state().contents_dirty);
    assert_eq!(engine.check_state(), CheckState::Idle);
    assert_eq!(host.live_markers(), first.len());
}

#[test]
fn test_clean_contents_skip_pass() {
    let host = RecordingHost::new(&["teh"]);
    let dictionary = hello_world();
    let engine = attach(&host, Rc::clone(&dictionary));
    engine.enable();
    let lookups = dictionary.lookups();

    engine.spell_check();
    assert_eq!(dictionary.lookups(), lookups);
}

#[test]
fn test_camel_case_words_checked_separately() {
    let host = RecordingHost::new(&["fooBarBaz"]);
    let dictionary = Rc::new(Known::new(&["foo", "bar", "baz"]));
    for tokenizer in [TokenizerPolicy::Scan, TokenizerPolicy::Split] {
        let options = EngineOptions {
            tokenizer,
            ..Default::default()
        };
        let engine = SpellCheckEngine::new(host.clone(), dictionary.clone(), options).unwrap();
        engine.enable();
        assert!(engine.flagged().is_empty(), "{} flagged camel parts", tokenizer);
    }
}

#[test]
fn test_reentrant_trigger_dropped() {
    let host = RecordingHost::new(&["Helo wrold"]);
    host.reenter_on_create();
    let dictionary = hello_world();
    let engine = attach(&host, Rc::clone(&dictionary));
    engine.enable();

    // one pass, one lookup per token
    assert_eq!(dictionary.lookups(), 2);
    assert_eq!(host.created().len(), 2);
    assert_eq!(host.live_markers(), 2);
    assert_eq!(engine.state().active_handles.len(), 2);
    // the mid-pass change is remembered, not replayed
    assert_eq!(engine.check_state(), CheckState::Dirty);
}

#[test]
fn test_enable_disable_round_trip() {
    let host = RecordingHost::new(&["teh cat", "wrold", "hello"]);
    let engine = attach(&host, hello_world());

    engine.enable();
    host.edit(&["teh teh", "wrold"]);
    engine.disable();

    let created = host.count(|c| matches!(c, Call::Create(..)));
    let removed = host.count(|c| matches!(c, Call::Remove(_)));
    assert_eq!(created, removed);
    assert_eq!(host.live_markers(), 0);
    assert!(engine.state().active_handles.is_empty());
    assert!(!engine.is_enabled());

    // listener stays registered but idles
    host.take_calls();
    host.edit(&["teh"]);
    assert!(host.calls().is_empty());
    assert_eq!(host.listener_count(), 1);
}

#[test]
fn test_disable_from_inside_a_pass() {
    let host = RecordingHost::new(&["teh wrold"]);
    let engine = Rc::new(attach(&host, hello_world()));
    let weak = Rc::downgrade(&engine);
    host.on_create(move || {
        if let Some(engine) = weak.upgrade() {
            engine.disable();
        }
    });

    engine.enable();

    assert!(!engine.is_enabled());
    assert_eq!(host.live_markers(), 0);
    assert!(engine.state().active_handles.is_empty());
    assert_eq!(engine.check_state(), CheckState::Idle);
}

#[test]
fn test_enable_from_marker_removal() {
    let host = RecordingHost::new(&["teh"]);
    let engine = Rc::new(attach(&host, hello_world()));
    engine.enable();

    let weak = Rc::downgrade(&engine);
    host.on_remove(move || {
        if let Some(engine) = weak.upgrade() {
            engine.enable();
        }
    });
    engine.disable();

    // the enable requested mid-clear runs once the clear is done
    assert!(engine.is_enabled());
    assert_eq!(host.live_markers(), 1);
    assert_eq!(engine.state().active_handles.len(), 1);
    assert_eq!(engine.check_state(), CheckState::Idle);
}

#[test]
fn test_toggle_from_marker_removal() {
    let host = RecordingHost::new(&["teh wrold"]);
    let engine = Rc::new(attach(&host, hello_world()));
    engine.enable();

    let weak = Rc::downgrade(&engine);
    host.on_remove(move || {
        if let Some(engine) = weak.upgrade() {
            engine.toggle();
        }
    });
    engine.toggle();

    // off, on, off again: the last request wins and nothing is left behind
    assert!(!engine.is_enabled());
    assert_eq!(host.live_markers(), 0);
    assert!(engine.state().active_handles.is_empty());
    assert_eq!(
        host.count(|c| matches!(c, Call::Remove(_))),
        host.count(|c| matches!(c, Call::Create(..)))
    );
}

#[test]
fn test_dropping_engine_detaches_listener() {
    let host = RecordingHost::new(&["teh"]);
    {
        let engine = attach(&host, hello_world());
        engine.enable();
        assert_eq!(host.listener_count(), 1);
    }
    assert_eq!(host.listener_count(), 0);
    assert_eq!(host.live_markers(), 0);

    host.take_calls();
    host.edit(&["teh wrold"]);
    assert!(host.calls().is_empty());
}

#[test]
fn test_suggestions() {
    let host = RecordingHost::new(&[]);
    let engine = attach(&host, hello_world());

    assert_eq!(
        engine.suggest("teh"),
        Some(vec!["the".to_string(), "ten".to_string()])
    );
    assert_eq!(engine.suggest("the"), None);
    assert_eq!(engine.suggest("zzzz"), None);
    assert!(host.calls().is_empty());
}

#[test]
fn test_unavailable_host_keeps_annotations() {
    let host = RecordingHost::new(&["teh"]);
    let engine = attach(&host, hello_world());
    engine.enable();
    let before = engine.state().active_handles;
    assert_eq!(before.len(), 1);

    host.take_calls();
    host.set_available(false);
    host.edit(&["teh wrold"]);

    let state = engine.state();
    assert_eq!(state.active_handles, before);
    assert!(state.enabled);
    assert!(state.contents_dirty);
    assert!(host.calls().is_empty());

    host.set_available(true);
    engine.spell_check();
    assert_eq!(engine.flagged().len(), 2);
    assert_eq!(host.live_markers(), 2);
}

#[test]
fn test_disable_on_unavailable_host_forgets_handles() {
    let host = RecordingHost::new(&["teh"]);
    let engine = attach(&host, hello_world());
    engine.enable();

    host.set_available(false);
    engine.disable();

    assert!(engine.state().active_handles.is_empty());
    assert_eq!(host.count(|c| matches!(c, Call::Remove(_))), 1);
}

#[test]
fn test_pending_dictionary_defers_check() {
    let host = RecordingHost::new(&["teh cat"]);
    let dictionary: Rc<PendingDictionary<Known>> = Rc::new(PendingDictionary::new());
    let engine =
        SpellCheckEngine::new(host.clone(), dictionary.clone(), EngineOptions::default()).unwrap();
    engine.enable();

    let state = engine.state();
    assert!(!state.dictionary_ready);
    assert!(state.contents_dirty);
    assert!(host.created().is_empty());
    assert_eq!(engine.suggest("teh"), None);

    dictionary.install(Known::new(&["the", "cat"]));
    engine.spell_check();

    assert_eq!(host.created(), vec![MisspellingRange::new(0, 0, 3)]);
    assert!(!engine.state().contents_dirty);
}

#[test]
fn test_engines_are_independent() {
    let left = RecordingHost::new(&["teh a"]);
    let right = RecordingHost::new(&["teh b"]);
    let dictionary = hello_world();
    let left_engine = attach(&left, Rc::clone(&dictionary));
    let right_engine = attach(&right, Rc::clone(&dictionary));
    left_engine.enable();
    right_engine.enable();

    right.take_calls();
    left.edit(&["hello a"]);

    assert!(right.calls().is_empty());
    assert_eq!(right_engine.state().active_handles.len(), 2);
    assert_eq!(left_engine.flagged(), vec![MisspellingRange::new(0, 6, 7)]);
}

#[test]
fn test_host_without_line_indicators() {
    let host = RecordingHost::new(&["teh", "wrold"]).without_line_indicators();
    let engine = attach(&host, hello_world());
    engine.enable();
    host.edit(&["hello"]);
    engine.disable();

    assert_eq!(
        host.count(|c| matches!(c, Call::SetIndicator(_) | Call::ClearIndicator(_))),
        0
    );
    assert_eq!(host.created().len(), 2);
}

#[test]
fn test_shrinking_document_clears_stale_indicator() {
    let host = RecordingHost::new(&["hello", "hello", "teh"]);
    let engine = attach(&host, hello_world());
    engine.enable();
    assert_eq!(host.count(|c| *c == Call::SetIndicator(2)), 1);

    host.take_calls();
    host.edit(&["hello"]);
    assert_eq!(host.count(|c| *c == Call::ClearIndicator(2)), 1);
    assert!(engine.flagged().is_empty());
}
