// Unit tests for domain models

use super::*;

#[test]
fn test_timestamp_keeps_raw_text() {
    let ts = Timestamp::parse(" 00:01:30 ").unwrap();
    assert_eq!(ts.as_str(), "00:01:30");
    assert_eq!(ts.seconds(), 90.0);
    assert_eq!(ts.to_string(), "00:01:30");
}

#[test]
fn test_timestamp_drops_text_after_comma() {
    let ts = Timestamp::parse("00:00:10,500").unwrap();
    assert_eq!(ts.as_str(), "00:00:10");
    assert_eq!(ts.seconds(), 10.0);
}

#[test]
fn test_timestamp_zero() {
    assert_eq!(Timestamp::zero().seconds(), 0.0);
    assert_eq!(Timestamp::zero().as_str(), "00:00:00");
}

#[test]
fn test_frame_rate_parse() {
    let rate = FrameRate::parse("30000/1001").unwrap();
    assert!((rate.as_f64() - 29.97).abs() < 0.01);
    assert_eq!(FrameRate::parse("25/1").unwrap().as_f64(), 25.0);
}

#[test]
fn test_frame_rate_parse_rejects_unusable() {
    assert_eq!(FrameRate::parse("0/0"), None);
    assert_eq!(FrameRate::parse("30/0"), None);
    assert_eq!(FrameRate::parse("30"), None);
    assert_eq!(FrameRate::parse("a/b"), None);
}

#[test]
fn test_estimated_frame_count_prefers_nb_frames() {
    let mut descriptor = StreamDescriptor::new("h264");
    descriptor.frame_count = Some(1234);
    descriptor.duration_seconds = Some(10.0);
    descriptor.avg_frame_rate = FrameRate::new(30, 1);
    assert_eq!(descriptor.estimated_frame_count(), Some(1234));
}

#[test]
fn test_estimated_frame_count_from_duration() {
    let mut descriptor = StreamDescriptor::new("h264");
    descriptor.duration_seconds = Some(10.5);
    descriptor.avg_frame_rate = FrameRate::new(30, 1);
    assert_eq!(descriptor.estimated_frame_count(), Some(315));

    descriptor.avg_frame_rate = None;
    assert_eq!(descriptor.estimated_frame_count(), None);
}

#[test]
fn test_filter_chain_rendering() {
    let chain = FilterChain::from_filters(vec![
        VideoFilter::PixelFormat("yuv420p".to_string()),
        VideoFilter::Fps(30.0),
        VideoFilter::ScaleToHeight(720),
    ]);
    assert_eq!(chain.to_string(), "format=yuv420p,fps=30,scale=-2:720");
    assert_eq!(chain.to_args(), vec!["-vf", "format=yuv420p,fps=30,scale=-2:720"]);
    assert!(FilterChain::default().to_args().is_empty());
}

#[test]
fn test_fractional_fps_filter() {
    assert_eq!(VideoFilter::Fps(2.5).to_string(), "fps=2.5");
}

#[test]
fn test_invocation_command_line() {
    let invocation = EncodeInvocation::new(
        "in.mkv",
        vec!["-c:v".to_string(), "copy".to_string()],
        "out.mp4",
    );
    assert_eq!(
        invocation.command_line(),
        vec!["-i", "in.mkv", "-c:v", "copy", "out.mp4"]
    );
}
