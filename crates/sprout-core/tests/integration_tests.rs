//! Integration tests for sprout-core's public reporting API.

use std::sync::Arc;

use sprout_core::report::{
    CaptureHandler, ColoredReportFormatter, LineFormatter, LogOptions, ReportFormatter,
    ReportLogger, ReportOptions, Severity, Sink,
};

fn capture_logger(formatter: Arc<dyn LineFormatter>) -> (ReportLogger, Arc<CaptureHandler>) {
    let capture = Arc::new(CaptureHandler::new());
    let logger = ReportLogger::builder()
        .sink(Arc::new(Sink::new("integration", capture.clone())))
        .formatter(formatter)
        .build();
    (logger, capture)
}

fn describe_step(logger: &ReportLogger, name: &str) {
    logger.report("invoke", name).unwrap();
    let _indent = logger.indent_one();
    logger
        .report_with("run", "git init", ReportOptions::new().context("/home/me/demo"))
        .unwrap();
}

#[test]
fn a_full_session_renders_as_a_tree() {
    let (logger, capture) =
        capture_logger(Arc::new(ReportFormatter::with_working_dir("/home/me")));

    logger.report("create", "/home/me/demo").unwrap();
    {
        let _indent = logger.indent_one();
        logger.report("create", "/home/me/demo/README.md").unwrap();
        describe_step(&logger, "init_git");
        logger.warning("almost done").unwrap();
    }
    logger
        .report_with("move", "/home/me/a", ReportOptions::new().target("/home/me/b"))
        .unwrap();

    assert_eq!(
        capture.text(),
        "create        demo\n\
         \x20 create        demo/README.md\n\
         \x20 invoke        init_git\n\
         \x20   run           git init from 'demo'\n\
         \x20 almost done\n\
         move          a to 'b'\n"
    );
    assert_eq!(logger.nesting(), 0);
}

#[test]
fn copies_share_the_sink_but_not_the_depth() {
    let (logger, capture) = capture_logger(Arc::new(ReportFormatter::with_working_dir("/")));
    let _outer = logger.indent(2);
    let copy = logger.copy();

    {
        let _inner = copy.indent_one();
        copy.info("copy").unwrap();
    }
    logger.info("original").unwrap();

    assert_eq!(
        capture.lines(),
        vec!["      copy".to_string(), "    original".to_string()]
    );

    copy.sink().set_level(Severity::Error);
    assert_eq!(logger.level(), Severity::Error);
}

#[test]
fn colored_output_strips_to_the_plain_layout() {
    let (plain, plain_capture) =
        capture_logger(Arc::new(ReportFormatter::with_working_dir("/srv")));
    let (colored, colored_capture) =
        capture_logger(Arc::new(ColoredReportFormatter::with_working_dir("/srv")));

    for logger in [&plain, &colored] {
        logger
            .report_with(
                "create",
                "/srv/app/x.txt",
                ReportOptions::new().context("/srv/tmpl").target("/srv/app"),
            )
            .unwrap();
        logger.error("boom").unwrap();
    }

    let stripped: Vec<String> = colored_capture
        .lines()
        .iter()
        .map(|l| console::strip_ansi_codes(l).into_owned())
        .collect();
    assert_eq!(stripped, plain_capture.lines());
    assert_ne!(colored_capture.lines(), plain_capture.lines());
}

#[test]
fn reconfigure_sets_threshold_for_every_holder() {
    let capture = Arc::new(CaptureHandler::new());
    let sink = Arc::new(Sink::new("shared", capture.clone()));
    let mut primary = ReportLogger::new(sink.clone());
    let other = ReportLogger::new(sink);

    primary.reconfigure(&LogOptions {
        log_level: Severity::Warning,
        no_color: true,
    });
    other.info("hidden").unwrap();
    other.warning("shown").unwrap();

    assert_eq!(capture.lines(), vec!["shown".to_string()]);
}
