use RustedMathForm::Utils::settings::Settings;
use RustedMathForm::numerical::function_analysis::Domain;
use RustedMathForm::session::i18n::Locale;
use RustedMathForm::session::narration::{Narrator, ScriptNarrator};
use RustedMathForm::session::state::{Banner, Payload, Request, SessionState, handle};
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, tempdir};

fn calc(a: &str, op: &str, b: &str) -> Request {
    Request::Arithmetic {
        a: a.to_string(),
        b: b.to_string(),
        operation: op.to_string(),
    }
}

#[test]
fn a_whole_session_in_arabic() {
    let state = SessionState::default();
    let (state, response) = handle(state, calc("5", "قسمة", "0"));
    assert_eq!(
        response.banner,
        Banner::Error("لا يمكن القسمة على صفر".to_string())
    );

    let (state, response) = handle(state, calc("5", "قسمة", "2"));
    assert_eq!(response.banner, Banner::Success("النتيجة = 2.5".to_string()));

    let (state, response) = handle(
        state,
        Request::Solve {
            equation: "x**2-4*x+3=0".to_string(),
        },
    );
    assert_eq!(response.banner.text(), "الحل: [1, 3]");
    assert!(response.explanation.lines.iter().any(|l| l == "درجة المعادلة: 2"));

    let (state, response) = handle(
        state,
        Request::Solve {
            equation: "2*x+".to_string(),
        },
    );
    assert!(response.banner.is_error());

    assert_eq!(
        state.history_newest_first(),
        vec!["x**2-4*x+3=0 -> [1, 3]", "5 قسمة 2 = 2.5"]
    );
}

#[test]
fn settings_file_drives_the_session() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# english, narrow plot").unwrap();
    writeln!(file, "plot").unwrap();
    writeln!(file, "x_min: 0").unwrap();
    writeln!(file, "x_max: 4").unwrap();
    writeln!(file, "points: 5").unwrap();
    writeln!(file, "session").unwrap();
    writeln!(file, "locale: en").unwrap();
    let settings = Settings::from_file(file.path()).unwrap();
    let state = SessionState::new(settings);
    assert_eq!(state.locale(), Locale::English);

    let (state, response) = handle(
        state,
        Request::Plot {
            function: "x^2".to_string(),
            domain: None,
            points: None,
            analyze: true,
        },
    );
    assert_eq!(response.banner.text(), "Plotted x**2");
    match &response.payload {
        Payload::Analysis(analysis) => {
            assert_eq!(analysis.domain, Domain::new(0.0, 4.0).unwrap());
            assert_eq!(analysis.samples.y.to_vec(), vec![0.0, 1.0, 4.0, 9.0, 16.0]);
            assert_eq!(analysis.roots, vec![0.0]);
        }
        other => panic!("unexpected payload {:?}", other),
    }
    assert_eq!(state.history.len(), 1);
}

#[test]
fn narration_keeps_one_artifact() {
    let dir = tempdir().unwrap();
    let mut narrator = ScriptNarrator::new(&dir.path().join("narration.txt"));
    let state = SessionState::default();
    let (state, first) = handle(state, calc("2", "+", "2"));
    let (_, second) = handle(
        state,
        Request::Solve {
            equation: "3x = 12".to_string(),
        },
    );
    narrator.narrate(&first.explanation.script()).unwrap();
    let path = narrator.narrate(&second.explanation.script()).unwrap();
    let content = fs::read_to_string(path).unwrap();
    assert!(content.contains("4"));
    assert!(content.contains("الحل رقم 1: 4"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}
