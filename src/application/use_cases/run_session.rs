//! # Run Session Use Case
//!
//! 計算セッションの実行ユースケース
//!
//! ## 流れ
//!
//! `Start → ReadOperand1 → ReadOperator → ReadOperand2 → Compute → {Success | Failure} → End`
//!
//! 各検証ステップは `Result` を返し、失敗すると `?` で最終報告ステップに短絡する。

use log::{debug, warn};
use std::io::{BufRead, Write};

use crate::domain::entities::log_event::LogEvent;
use crate::domain::entities::operator::Operator;
use crate::domain::entities::session::{parse_operand, Session};
use crate::domain::errors::CalcError;
use crate::domain::repositories::event_log::EventLog;

pub const BANNER: &str = "===== Logging Calculator =====";
pub const PROMPT_OPERAND1: &str = "Enter first number: ";
pub const PROMPT_OPERATOR: &str = "Enter operator (+, -, *, /): ";
pub const PROMPT_OPERAND2: &str = "Enter second number: ";

pub const STARTED_MESSAGE: &str = "=== Application Started ===";
pub const ENDED_MESSAGE: &str = "=== Application Ended ===";

/// セッションの結果
#[derive(Debug)]
pub enum SessionOutcome {
    Success(Session),
    Failure(CalcError),
}

impl SessionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SessionOutcome::Success(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionOutcome::Success(session) => Some(session),
            SessionOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&CalcError> {
        match self {
            SessionOutcome::Success(_) => None,
            SessionOutcome::Failure(err) => Some(err),
        }
    }
}

/// セッション中のイベント送出
///
/// 全イベントに `SessionId` を付与し、`log` ファサードにも debug で複製する。
/// 書き込み失敗はセッションを中断しない。
struct EventEmitter<'a, L: EventLog + ?Sized> {
    logger: &'a mut L,
    session_id: &'a str,
}

impl<L: EventLog + ?Sized> EventEmitter<'_, L> {
    fn emit(&mut self, event: LogEvent) {
        let event = event.with("SessionId", self.session_id);
        debug!(
            target: "logcalc::session",
            "[{}] {}",
            event.severity.code(),
            event.render()
        );

        if let Err(e) = self.logger.write(&event) {
            warn!("Failed to write log event: {}", e);
        }
    }
}

/// 計算セッション実行ユースケース
pub struct RunSessionUseCase {
    session_id: String,
    machine_name: Option<String>,
}

impl RunSessionUseCase {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `session_id` - ログイベントの相関に使うID
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            machine_name: None,
        }
    }

    /// 開始イベントに記録するマシン名を設定
    pub fn with_machine_name(mut self, machine_name: impl Into<String>) -> Self {
        self.machine_name = Some(machine_name.into());
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// セッションを実行する
    ///
    /// 失敗はすべてここで捕捉され、Fatal イベントと `Error: ...` 行として報告される。
    /// 結果に関わらず終了イベントを記録し、ロガーをフラッシュしてから返る。
    ///
    /// # Arguments
    ///
    /// * `input` - 入力ストリーム（1行ずつ読む）
    /// * `output` - 出力ストリーム
    /// * `logger` - ログイベントの出力先
    pub fn run<R, W, L>(&self, input: &mut R, output: &mut W, logger: &mut L) -> SessionOutcome
    where
        R: BufRead,
        W: Write,
        L: EventLog + ?Sized,
    {
        let mut events = EventEmitter {
            logger,
            session_id: &self.session_id,
        };

        let mut started = LogEvent::info(STARTED_MESSAGE);
        if let Some(machine_name) = &self.machine_name {
            started = started.with("MachineName", machine_name.as_str());
        }
        events.emit(started);

        let outcome = match Self::calculate(input, output, &mut events) {
            Ok(session) => SessionOutcome::Success(session),
            Err(err) => {
                events.emit(
                    LogEvent::fatal("An error occurred during calculation")
                        .with("ErrorKind", err.kind())
                        .with("Error", err.to_string()),
                );
                if let Err(e) = writeln!(output, "Error: {}", err).and_then(|_| output.flush()) {
                    warn!("Failed to report error to console: {}", e);
                }
                SessionOutcome::Failure(err)
            }
        };

        events.emit(LogEvent::info(ENDED_MESSAGE));
        if let Err(e) = events.logger.close_and_flush() {
            warn!("Failed to flush event log: {}", e);
        }

        outcome
    }

    fn calculate<R, W, L>(
        input: &mut R,
        output: &mut W,
        events: &mut EventEmitter<'_, L>,
    ) -> Result<Session, CalcError>
    where
        R: BufRead,
        W: Write,
        L: EventLog + ?Sized,
    {
        writeln!(output, "{}", BANNER)?;

        let raw_operand1 = prompt(input, output, PROMPT_OPERAND1)?;
        let operand1 = parse_operand(&raw_operand1).inspect_err(|_| {
            events.emit(
                LogEvent::error("Invalid first number input: {Input}")
                    .with("Input", raw_operand1.as_str()),
            )
        })?;

        let raw_operator = prompt(input, output, PROMPT_OPERATOR)?;
        let operator = raw_operator.parse::<Operator>().inspect_err(|_| {
            events.emit(
                LogEvent::error("Invalid operator entered: {Operator}")
                    .with("Operator", raw_operator.as_str()),
            )
        })?;

        let raw_operand2 = prompt(input, output, PROMPT_OPERAND2)?;
        let operand2 = parse_operand(&raw_operand2).inspect_err(|_| {
            events.emit(
                LogEvent::error("Invalid second number input: {Input}")
                    .with("Input", raw_operand2.as_str()),
            )
        })?;

        events.emit(
            LogEvent::info("Inputs received: Num1={Num1}, Num2={Num2}, Operator={Operator}")
                .with("Num1", operand1)
                .with("Num2", operand2)
                .with("Operator", operator),
        );

        let session = Session::compute(operand1, operator, operand2).inspect_err(|err| {
            if let CalcError::DivisionByZero { .. } = err {
                events.emit(
                    LogEvent::error("Divide by zero error. Num1={Num1}, Num2={Num2}")
                        .with("Num1", operand1)
                        .with("Num2", operand2),
                )
            }
        })?;

        writeln!(output, "Result: {}", session.result())?;
        output.flush()?;

        events.emit(
            LogEvent::info("Calculation successful: {Num1} {Operator} {Num2} = {Result}")
                .with("Num1", session.operand1())
                .with("Operator", session.operator())
                .with("Num2", session.operand2())
                .with("Result", session.result()),
        );

        Ok(session)
    }
}

/// プロンプトを表示して1行読む
///
/// 行末の改行だけを取り除く。UTF-8 として不正なバイトは U+FFFD に置き換え、
/// 検証ステップで不正な入力として扱わせる。EOF の場合は空文字列を返す。
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> Result<String, CalcError> {
    write!(output, "{}", message)?;
    output.flush()?;

    let mut buf = Vec::new();
    input.read_until(b'\n', &mut buf)?;

    let line = String::from_utf8_lossy(&buf);
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::log_event::{FieldValue, Severity};
    use crate::domain::repositories::event_log::MockEventLog;
    use std::io::{self, BufReader, Cursor, Read};

    /// イベントを記録するだけのテスト用ロガー
    #[derive(Default)]
    struct RecordingEventLog {
        events: Vec<LogEvent>,
        flush_count: usize,
    }

    impl EventLog for RecordingEventLog {
        fn write(&mut self, event: &LogEvent) -> io::Result<()> {
            self.events.push(event.clone());
            Ok(())
        }

        fn close_and_flush(&mut self) -> io::Result<()> {
            self.flush_count += 1;
            Ok(())
        }
    }

    fn run_with(input: &str) -> (SessionOutcome, String, RecordingEventLog) {
        run_with_bytes(input.as_bytes())
    }

    fn run_with_bytes(input: &[u8]) -> (SessionOutcome, String, RecordingEventLog) {
        let use_case = RunSessionUseCase::new("session-001");
        let mut input = Cursor::new(input.to_vec());
        let mut output = Vec::new();
        let mut logger = RecordingEventLog::default();

        let outcome = use_case.run(&mut input, &mut output, &mut logger);

        (outcome, String::from_utf8(output).unwrap(), logger)
    }

    fn templates(logger: &RecordingEventLog) -> Vec<&str> {
        logger.events.iter().map(|e| e.template.as_str()).collect()
    }

    #[test]
    fn test_addition_success() {
        let (outcome, output, logger) = run_with("6\n+\n3\n");

        assert!(outcome.is_success());
        assert_eq!(outcome.session().unwrap().result(), 9.0);
        assert!(output.contains("Result: 9\n"));
        assert!(!output.contains("Error:"));
        assert_eq!(
            templates(&logger),
            vec![
                STARTED_MESSAGE,
                "Inputs received: Num1={Num1}, Num2={Num2}, Operator={Operator}",
                "Calculation successful: {Num1} {Operator} {Num2} = {Result}",
                ENDED_MESSAGE,
            ]
        );
        assert_eq!(logger.flush_count, 1);
    }

    #[test]
    fn test_all_operators() {
        let cases = [
            ("7\n-\n2\n", 5.0),
            ("7\n*\n2\n", 14.0),
            ("7\n/\n2\n", 3.5),
            ("0.1\n+\n0.2\n", 0.1 + 0.2),
        ];

        for (input, expected) in cases {
            let (outcome, output, _) = run_with(input);
            assert_eq!(outcome.session().unwrap().result(), expected, "input {:?}", input);
            assert!(output.contains(&format!("Result: {}", expected)));
        }
    }

    #[test]
    fn test_prompts_are_written_in_order() {
        let (_, output, _) = run_with("1\n+\n2\n");

        let banner = output.find(BANNER).unwrap();
        let first = output.find(PROMPT_OPERAND1).unwrap();
        let operator = output.find(PROMPT_OPERATOR).unwrap();
        let second = output.find(PROMPT_OPERAND2).unwrap();

        assert!(banner < first && first < operator && operator < second);
    }

    #[test]
    fn test_invalid_first_number() {
        let (outcome, output, logger) = run_with("abc\n+\n3\n");

        assert!(matches!(
            outcome.error(),
            Some(CalcError::InvalidNumber { input }) if input == "abc"
        ));
        assert!(output.contains("Error: Invalid number input!"));
        assert!(!output.contains(PROMPT_OPERATOR));

        let error_event = &logger.events[1];
        assert_eq!(error_event.severity, Severity::Error);
        assert_eq!(error_event.render(), "Invalid first number input: abc");
        assert_eq!(error_event.field("Input"), Some(&FieldValue::from("abc")));
    }

    #[test]
    fn test_invalid_second_number() {
        let (outcome, output, logger) = run_with("6\n+\nxyz\n");

        assert!(matches!(outcome.error(), Some(CalcError::InvalidNumber { .. })));
        assert!(output.contains("Error: Invalid number input!"));
        assert!(logger
            .events
            .iter()
            .any(|e| e.render() == "Invalid second number input: xyz"));
    }

    #[test]
    fn test_invalid_operator() {
        let (outcome, output, logger) = run_with("6\n%\n3\n");

        assert!(matches!(
            outcome.error(),
            Some(CalcError::InvalidOperator { input }) if input == "%"
        ));
        assert!(output.contains("Error: Invalid operator!"));
        assert!(!output.contains(PROMPT_OPERAND2));
        assert_eq!(logger.events[1].render(), "Invalid operator entered: %");
        assert_eq!(logger.events[1].severity, Severity::Error);
    }

    #[test]
    fn test_padded_operator_is_rejected() {
        let (outcome, output, logger) = run_with("6\n + \n3\n");

        assert!(matches!(
            outcome.error(),
            Some(CalcError::InvalidOperator { input }) if input == " + "
        ));
        assert!(outcome.session().is_none());
        assert!(output.contains("Error: Invalid operator!"));
        assert!(!output.contains("Result:"));

        let error_event = &logger.events[1];
        assert_eq!(error_event.severity, Severity::Error);
        assert_eq!(error_event.field("Operator"), Some(&FieldValue::from(" + ")));
    }

    #[test]
    fn test_multi_character_operator_is_rejected() {
        let (outcome, output, logger) = run_with("6\n+-\n3\n");

        assert!(matches!(
            outcome.error(),
            Some(CalcError::InvalidOperator { input }) if input == "+-"
        ));
        assert!(output.contains("Error: Invalid operator!"));
        assert!(!output.contains(PROMPT_OPERAND2));
        assert_eq!(logger.events[1].render(), "Invalid operator entered: +-");
        assert_eq!(logger.events[1].severity, Severity::Error);
    }

    #[test]
    fn test_non_utf8_operand_is_invalid_number() {
        let (outcome, output, logger) = run_with_bytes(b"\xff\xfe\n+\n3\n");

        assert!(matches!(
            outcome.error(),
            Some(CalcError::InvalidNumber { input }) if input.contains('\u{FFFD}')
        ));
        assert!(output.contains("Error: Invalid number input!"));

        let error_event = &logger.events[1];
        assert_eq!(error_event.severity, Severity::Error);
        assert!(error_event.template.starts_with("Invalid first number input"));
        assert_eq!(
            error_event.field("Input"),
            Some(&FieldValue::from("\u{FFFD}\u{FFFD}"))
        );
    }

    #[test]
    fn test_non_utf8_operator_is_invalid_operator() {
        let (outcome, _, logger) = run_with_bytes(b"6\n\xff\n3\n");

        assert!(matches!(outcome.error(), Some(CalcError::InvalidOperator { .. })));
        assert!(logger
            .events
            .iter()
            .any(|e| e.template.starts_with("Invalid operator entered")));
    }

    #[test]
    fn test_failure_never_carries_session() {
        for input in ["abc\n", "6\n%\n", "6\n+\nxyz\n", "6\n/\n0\n", ""] {
            let (outcome, _, _) = run_with(input);
            assert!(!outcome.is_success(), "input {:?}", input);
            assert!(outcome.session().is_none(), "input {:?}", input);
            assert!(outcome.error().is_some(), "input {:?}", input);
        }
    }

    /// 読み込みが常に失敗する入力
    struct BrokenInput;

    impl Read for BrokenInput {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "stdin closed"))
        }
    }

    /// 書き込みが常に失敗する出力
    struct BrokenOutput;

    impl Write for BrokenOutput {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }
    }

    #[test]
    fn test_input_failure_reports_error_line() {
        let use_case = RunSessionUseCase::new("s");
        let mut input = BufReader::new(BrokenInput);
        let mut output = Vec::new();
        let mut logger = RecordingEventLog::default();

        let outcome = use_case.run(&mut input, &mut output, &mut logger);

        assert!(matches!(outcome.error(), Some(CalcError::ConsoleIo(_))));
        let output = String::from_utf8(output).unwrap();
        let last_line = output.lines().last().unwrap();
        assert_eq!(last_line, "Enter first number: Error: Console I/O failed: stdin closed");
        assert_eq!(logger.flush_count, 1);
    }

    #[test]
    fn test_output_failure_is_logged_and_session_still_ends() {
        let use_case = RunSessionUseCase::new("s");
        let mut input = Cursor::new(b"6\n+\n3\n".to_vec());
        let mut output = BrokenOutput;
        let mut logger = RecordingEventLog::default();

        let outcome = use_case.run(&mut input, &mut output, &mut logger);

        assert!(matches!(outcome.error(), Some(CalcError::ConsoleIo(_))));
        assert!(outcome.session().is_none());

        let n = logger.events.len();
        assert_eq!(logger.events[n - 2].severity, Severity::Fatal);
        assert_eq!(
            logger.events[n - 2].field("ErrorKind"),
            Some(&FieldValue::from("ConsoleIoError"))
        );
        assert_eq!(logger.events[n - 1].template, ENDED_MESSAGE);
        assert_eq!(logger.flush_count, 1);
    }

    #[test]
    fn test_empty_operator() {
        let (outcome, _, _) = run_with("6\n\n3\n");
        assert!(matches!(outcome.error(), Some(CalcError::InvalidOperator { .. })));
    }

    #[test]
    fn test_division_by_zero() {
        let (outcome, output, logger) = run_with("10\n/\n0\n");

        assert!(matches!(
            outcome.error(),
            Some(CalcError::DivisionByZero { .. })
        ));
        assert!(output.contains("Error: Cannot divide by zero!"));
        assert!(!output.contains("Result:"));

        let div_event = logger
            .events
            .iter()
            .find(|e| e.template.starts_with("Divide by zero"))
            .unwrap();
        assert_eq!(div_event.severity, Severity::Error);
        assert_eq!(div_event.render(), "Divide by zero error. Num1=10, Num2=0");
    }

    #[test]
    fn test_failure_logs_fatal_before_end() {
        let (_, _, logger) = run_with("6\n/\n0\n");

        let n = logger.events.len();
        let fatal = &logger.events[n - 2];
        assert_eq!(fatal.severity, Severity::Fatal);
        assert_eq!(
            fatal.field("Error"),
            Some(&FieldValue::from("Cannot divide by zero!"))
        );
        assert_eq!(
            fatal.field("ErrorKind"),
            Some(&FieldValue::from("DivisionByZeroError"))
        );
        assert_eq!(logger.events[n - 1].template, ENDED_MESSAGE);
    }

    #[test]
    fn test_eof_is_invalid_number() {
        let (outcome, output, logger) = run_with("");

        assert!(matches!(
            outcome.error(),
            Some(CalcError::InvalidNumber { input }) if input.is_empty()
        ));
        assert!(output.contains("Error: Invalid number input!"));
        assert_eq!(logger.flush_count, 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let (outcome, _, _) = run_with("6\r\n*\r\n3\r\n");
        assert_eq!(outcome.session().unwrap().result(), 18.0);
    }

    #[test]
    fn test_started_and_ended_bracket_every_outcome() {
        for input in ["6\n+\n3\n", "abc\n", "6\n%\n", "6\n/\n0\n", ""] {
            let (_, _, logger) = run_with(input);
            let templates = templates(&logger);

            let started = templates.iter().filter(|t| **t == STARTED_MESSAGE).count();
            let ended = templates.iter().filter(|t| **t == ENDED_MESSAGE).count();

            assert_eq!(started, 1, "input {:?}", input);
            assert_eq!(ended, 1, "input {:?}", input);
            assert_eq!(templates.first(), Some(&STARTED_MESSAGE));
            assert_eq!(templates.last(), Some(&ENDED_MESSAGE));
        }
    }

    #[test]
    fn test_every_event_has_session_id() {
        let (_, _, logger) = run_with("6\n/\n0\n");

        assert!(logger
            .events
            .iter()
            .all(|e| e.field("SessionId") == Some(&FieldValue::from("session-001"))));
    }

    #[test]
    fn test_machine_name_on_started_event() {
        let use_case = RunSessionUseCase::new("s").with_machine_name("build-host");
        let mut input = Cursor::new(b"1\n+\n1\n".to_vec());
        let mut output = Vec::new();
        let mut logger = RecordingEventLog::default();

        use_case.run(&mut input, &mut output, &mut logger);

        assert_eq!(
            logger.events[0].field("MachineName"),
            Some(&FieldValue::from("build-host"))
        );
        assert!(logger.events[1].field("MachineName").is_none());
    }

    #[test]
    fn test_logger_write_failure_does_not_abort_session() {
        let mut logger = MockEventLog::new();
        logger
            .expect_write()
            .returning(|_| Err(io::Error::new(io::ErrorKind::Other, "disk full")));
        logger.expect_close_and_flush().times(1).returning(|| Ok(()));

        let use_case = RunSessionUseCase::new("s");
        let mut input = Cursor::new(b"6\n+\n3\n".to_vec());
        let mut output = Vec::new();

        let outcome = use_case.run(&mut input, &mut output, &mut logger);

        assert!(outcome.is_success());
        assert!(String::from_utf8(output).unwrap().contains("Result: 9"));
    }

    #[test]
    fn test_close_and_flush_called_once_on_failure() {
        let mut logger = MockEventLog::new();
        logger.expect_write().times(4).returning(|_| Ok(()));
        logger.expect_close_and_flush().times(1).returning(|| Ok(()));

        let use_case = RunSessionUseCase::new("s");
        let mut input = Cursor::new(b"abc\n".to_vec());
        let mut output = Vec::new();

        let outcome = use_case.run(&mut input, &mut output, &mut logger);

        assert!(!outcome.is_success());
    }
}
