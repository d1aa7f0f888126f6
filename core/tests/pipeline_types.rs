use galileo_core::{AppMode, AudioBuffer, HandlePool, MusicTrack, Signal};

#[test]
fn test_audio_buffer_to_signal() {
    let buffer = AudioBuffer::new(24000, vec![vec![0.5, -0.5], vec![0.25, -0.25]]).unwrap();
    let Signal::Audio {
        sample_rate,
        channels,
        data,
        ..
    } = buffer.to_signal(0)
    else {
        panic!("expected an audio signal");
    };
    assert_eq!(sample_rate, 24000);
    assert_eq!(channels, 2);
    assert_eq!(data, vec![0.5, 0.25, -0.5, -0.25]);
}

#[test]
fn test_superseded_resources_do_not_accumulate() {
    let pool = HandlePool::new();
    let mut current = None;
    for i in 0..50 {
        let next = pool.allocate(format!("take-{i}"));
        if let Some(previous) = current.replace(next) {
            assert!(pool.release(previous));
        }
    }
    assert_eq!(pool.len(), 1);
    let handle = current.unwrap();
    assert_eq!(pool.get(handle).as_deref().map(String::as_str), Some("take-49"));
}

#[test]
fn test_only_audio_modes_produce_audio() {
    let audio: Vec<_> = AppMode::ALL
        .into_iter()
        .filter(AppMode::produces_audio)
        .collect();
    assert_eq!(audio, vec![AppMode::PitchGenerator, AppMode::TextToSpeech]);
}

#[test]
fn test_music_track_serializes_fields() {
    let track = MusicTrack::new("lofi-focus", "Lo-Fi Focus", "music/lofi-focus.mp3");
    let json = serde_json::to_value(&track).unwrap();
    assert_eq!(json["id"], "lofi-focus");
    assert_eq!(json["source"], "music/lofi-focus.mp3");
}
