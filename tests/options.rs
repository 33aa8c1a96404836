//! Tests for pipeline options parsing.

use anyhow::Result;
use ironbeam_join::*;

#[test]
fn test_default_is_warning() {
    assert_eq!(ChainedCoGroupCheck::default(), ChainedCoGroupCheck::Warning);
    assert_eq!(
        PipelineOptions::default().chained_cogroups,
        ChainedCoGroupCheck::Warning
    );
}

#[test]
fn test_from_str_is_case_insensitive() -> Result<()> {
    assert_eq!("OFF".parse::<ChainedCoGroupCheck>()?, ChainedCoGroupCheck::Off);
    assert_eq!("Warning".parse::<ChainedCoGroupCheck>()?, ChainedCoGroupCheck::Warning);
    assert_eq!(" warn ".parse::<ChainedCoGroupCheck>()?, ChainedCoGroupCheck::Warning);
    assert_eq!("error".parse::<ChainedCoGroupCheck>()?, ChainedCoGroupCheck::Error);
    assert!("fatal".parse::<ChainedCoGroupCheck>().is_err());
    Ok(())
}

#[test]
fn test_display_round_trips() -> Result<()> {
    for check in [
        ChainedCoGroupCheck::Off,
        ChainedCoGroupCheck::Warning,
        ChainedCoGroupCheck::Error,
    ] {
        assert_eq!(check.to_string().parse::<ChainedCoGroupCheck>()?, check);
    }
    Ok(())
}

#[test]
fn test_from_args() -> Result<()> {
    let opts = PipelineOptions::from_args(["--runner=direct", "--chainedCogroups=error"])?;
    assert_eq!(opts.chained_cogroups, ChainedCoGroupCheck::Error);

    let opts = PipelineOptions::from_args(vec!["--chained-cogroups=off".to_string()])?;
    assert_eq!(opts.chained_cogroups, ChainedCoGroupCheck::Off);

    let opts = PipelineOptions::from_args(["positional", "--flag"])?;
    assert_eq!(opts, PipelineOptions::default());

    let err = PipelineOptions::from_args(["--chainedCogroups=loud"]).unwrap_err();
    assert!(err.to_string().contains("chainedCogroups"));
    Ok(())
}

#[test]
fn test_from_json() -> Result<()> {
    let opts = PipelineOptions::from_json(r#"{"chained_cogroups":"error"}"#)?;
    assert_eq!(opts.chained_cogroups, ChainedCoGroupCheck::Error);

    let opts = PipelineOptions::from_json("{}")?;
    assert_eq!(opts, PipelineOptions::default());

    assert!(PipelineOptions::from_json(r#"{"chained_cogroups":"sometimes"}"#).is_err());

    let json = serde_json::to_string(&PipelineOptions::default().with_chained_cogroups(ChainedCoGroupCheck::Off))?;
    assert_eq!(json, r#"{"chained_cogroups":"off"}"#);
    Ok(())
}

#[test]
fn test_options_reach_the_pipeline() {
    let p = Pipeline::with_options(PipelineOptions::from_args(["--chainedCogroups=off"]).unwrap_or_default());
    assert_eq!(p.options().chained_cogroups, ChainedCoGroupCheck::Off);
    assert_eq!(p.clone().options().chained_cogroups, ChainedCoGroupCheck::Off);
}
