use super::*;
use chrono::{Datelike, Timelike, Weekday};
use cronvault_protocols::ErrorKind;

fn at(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).unwrap()
}

#[test]
fn test_interval_definition() {
    let trigger = compile_definition(&ScheduleDef::interval("24h")).unwrap();
    assert!(matches!(
        trigger.kind(),
        TriggerKind::Interval(d) if *d == Duration::from_secs(24 * 3600)
    ));

    let now = at(1_700_000_000_000);
    assert_eq!(
        trigger.next_fire(now),
        Some(now + chrono::Duration::hours(24))
    );
}

#[test]
fn test_interval_compound_and_millis() {
    let trigger = compile_definition(&ScheduleDef::interval("1h 30m")).unwrap();
    assert!(matches!(
        trigger.kind(),
        TriggerKind::Interval(d) if *d == Duration::from_secs(5400)
    ));

    let trigger = compile_definition(&ScheduleDef::interval("500ms")).unwrap();
    assert!(matches!(
        trigger.kind(),
        TriggerKind::Interval(d) if *d == Duration::from_millis(500)
    ));
}

#[test]
fn test_invalid_interval() {
    let err = compile_definition(&ScheduleDef::interval("soon")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractInvalid);

    let err = compile_definition(&ScheduleDef::interval("0s")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractInvalid);
}

#[test]
fn test_five_field_cron() {
    let trigger = compile_definition(&ScheduleDef::cron("*/5 * * * *")).unwrap();
    let next = trigger.next_fire(at(1_700_000_000_000)).unwrap();
    assert_eq!(next.second(), 0);
    assert_eq!(next.minute() % 5, 0);
}

#[test]
fn test_six_field_cron_requires_with_seconds() {
    let err = compile_definition(&ScheduleDef::cron("*/10 * * * * *")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractInvalid);

    let trigger = compile_definition(&ScheduleDef::cron_with_seconds("*/10 * * * * *")).unwrap();
    let next = trigger.next_fire(at(1_700_000_001_000)).unwrap();
    assert_eq!(next.second() % 10, 0);
}

#[test]
fn test_with_seconds_still_accepts_five_fields() {
    assert!(compile_definition(&ScheduleDef::cron_with_seconds("0 9 * * MON-FRI")).is_ok());
}

fn next_weekday(crontab: &str, after: DateTime<Utc>) -> (Weekday, u32) {
    let next = compile_definition(&ScheduleDef::cron(crontab))
        .unwrap()
        .next_fire(after)
        .unwrap();
    (next.weekday(), next.hour())
}

#[test]
fn test_numeric_weekdays_follow_crontab() {
    // Tuesday 2023-11-14 22:13 UTC
    let tuesday = at(1_700_000_000_000);
    assert_eq!(next_weekday("0 9 * * 1", tuesday), (Weekday::Mon, 9));
    assert_eq!(next_weekday("0 9 * * 0", tuesday), (Weekday::Sun, 9));
    assert_eq!(next_weekday("0 9 * * 7", tuesday), (Weekday::Sun, 9));
    assert_eq!(next_weekday("0 9 * * 1-5", tuesday), (Weekday::Wed, 9));
    assert_eq!(next_weekday("0 9 * * 6,0", tuesday), (Weekday::Sat, 9));

    // Friday 2023-11-17 22:13 UTC
    let friday = tuesday + chrono::Duration::days(3);
    assert_eq!(next_weekday("0 9 * * 1-5", friday), (Weekday::Mon, 9));
    assert_eq!(next_weekday("0 9 * * 5-7", friday), (Weekday::Sat, 9));
    assert_eq!(next_weekday("0 9 * * 1-5/2", friday), (Weekday::Mon, 9));
}

#[test]
fn test_weekday_names_and_steps_unchanged() {
    let tuesday = at(1_700_000_000_000);
    assert_eq!(next_weekday("0 9 * * MON", tuesday), (Weekday::Mon, 9));
    assert_eq!(next_weekday("0 9 * * */3", tuesday), (Weekday::Wed, 9));

    let trigger =
        compile_definition(&ScheduleDef::cron_with_seconds("30 0 9 * * 0")).unwrap();
    let next = trigger.next_fire(tuesday).unwrap();
    assert_eq!((next.weekday(), next.second()), (Weekday::Sun, 30));
}

#[test]
fn test_invalid_weekday() {
    for crontab in ["0 9 * * 8", "0 9 * * 5-2", "0 9 * * 1/0"] {
        let err = compile_definition(&ScheduleDef::cron(crontab)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContractInvalid, "{:?}", crontab);
    }
}

#[test]
fn test_every_descriptor_is_an_interval() {
    let trigger = compile_definition(&ScheduleDef::cron("@every 1h30m")).unwrap();
    assert!(matches!(
        trigger.kind(),
        TriggerKind::Interval(d) if *d == Duration::from_secs(5400)
    ));

    let err = compile_definition(&ScheduleDef::cron("@every soon")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractInvalid);
    let err = compile_definition(&ScheduleDef::cron("@every")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractInvalid);
}

#[test]
fn test_unrepresentable_interval() {
    let err = compile_definition(&ScheduleDef::interval("300000years")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractInvalid);

    let trigger = TriggerSpec::interval(Duration::from_secs(300_000 * 365 * 86_400));
    assert_eq!(trigger.next_fire(Utc::now()), None);
}

#[test]
fn test_cron_descriptor() {
    let trigger = compile_definition(&ScheduleDef::cron("@hourly")).unwrap();
    let next = trigger.next_fire(at(1_700_000_000_000)).unwrap();
    assert_eq!((next.minute(), next.second()), (0, 0));
}

#[test]
fn test_invalid_cron() {
    for crontab in ["", "* * *", "61 * * * *", "a b c d e"] {
        let err = compile_definition(&ScheduleDef::cron(crontab)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContractInvalid, "{:?}", crontab);
    }
}

#[test]
fn test_interval_window_start_in_future() {
    let start = 1_700_000_600_000;
    let trigger =
        compile_definition(&ScheduleDef::interval("1m").with_window(Some(start), None)).unwrap();

    let now = at(1_700_000_000_000);
    assert_eq!(trigger.next_fire(now), Some(at(start)));
    assert_eq!(
        trigger.next_fire(at(start)),
        Some(at(start) + chrono::Duration::minutes(1))
    );
}

#[test]
fn test_cron_window_start_in_future() {
    let start = 1_700_000_000_000;
    let trigger =
        compile_definition(&ScheduleDef::cron("* * * * *").with_window(Some(start), None))
            .unwrap();

    let next = trigger.next_fire(at(start - 3_600_000)).unwrap();
    assert!(next > at(start));
    assert!(next <= at(start) + chrono::Duration::minutes(1));
}

#[test]
fn test_window_end_stops_firing() {
    let end = 1_700_000_030_000;
    let trigger =
        compile_definition(&ScheduleDef::interval("1m").with_window(None, Some(end))).unwrap();

    assert_eq!(trigger.next_fire(at(1_700_000_000_000)), None);
    assert_eq!(
        trigger.next_fire(at(end - 90_000)),
        Some(at(end - 30_000))
    );
}

#[test]
fn test_window_end_before_start() {
    let def = ScheduleDef::interval("1m").with_window(Some(2_000), Some(1_000));
    let err = compile_definition(&def).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractInvalid);
}

#[test]
fn test_display() {
    let trigger = compile_definition(&ScheduleDef::interval("90s")).unwrap();
    assert_eq!(trigger.to_string(), "every 1m 30s");
}
