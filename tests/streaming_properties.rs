//! Property tests for the streaming decoder
//!
//! Chunk boundaries must never change what a stream yields.

mod support;

use askdata::streaming::{ByteStream, LineDecoder, ResponseStream};
use askdata::types::{parse_str, Parsed};
use bytes::Bytes;
use futures_util::StreamExt;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use support::{DATA, RESULT, START};

/// Feed `text` to a stream in chunks cut at the given byte offsets
fn run_stream(text: &str, cuts: &[usize]) -> Vec<Parsed> {
    let bytes = text.as_bytes();
    let mut offsets: Vec<usize> = cuts.iter().map(|c| c % (bytes.len() + 1)).collect();
    offsets.push(0);
    offsets.push(bytes.len());
    offsets.sort_unstable();
    offsets.dedup();

    let chunks: Vec<askdata::Result<Bytes>> = offsets
        .windows(2)
        .map(|w| Ok(Bytes::copy_from_slice(&bytes[w[0]..w[1]])))
        .collect();
    let body: ByteStream = Box::pin(futures_util::stream::iter(chunks));

    tokio_test::block_on(async {
        ResponseStream::new(body)
            .map(|item| item.expect("lenient stream never yields errors"))
            .collect()
            .await
    })
}

#[quickcheck]
fn prop_split_record_matches_single_chunk(cut: usize) -> bool {
    let text = format!("{}\n", RESULT);
    let whole = run_stream(&text, &[]);
    let split = run_stream(&text, &[cut]);

    whole.len() == 1 && split == whole
}

#[quickcheck]
fn prop_arbitrary_chunking_preserves_records(cuts: Vec<usize>) -> bool {
    let records = [START, DATA, RESULT, START];
    let text = records.iter().map(|r| format!("{}\n", r)).collect::<String>();

    let expected: Vec<Parsed> = records.iter().map(|r| parse_str(r).unwrap()).collect();
    run_stream(&text, &cuts) == expected
}

#[quickcheck]
fn prop_multibyte_text_survives_any_split(cuts: Vec<usize>) -> bool {
    let line = START.replace("How many users?", "Wie viele Nutzer gibt es in Köln? 日本語 🚀");
    let text = format!("{}\n", line);

    let events = run_stream(&text, &cuts);
    events == vec![parse_str(&line).unwrap()]
}

#[quickcheck]
fn prop_malformed_line_is_dropped(n: u8, bad_at: u8) -> TestResult {
    let n = usize::from(n % 10) + 1;
    let bad_at = usize::from(bad_at) % n;

    let mut lines: Vec<String> = (0..n).map(|_| DATA.to_string()).collect();
    lines[bad_at] = r#"{"__type__":"responseData","callId":"#.to_string();
    let text = lines.iter().map(|l| format!("{}\n", l)).collect::<String>();

    TestResult::from_bool(run_stream(&text, &[7, 150, 333]).len() == n - 1)
}

#[quickcheck]
fn prop_decoder_output_independent_of_chunking(cuts: Vec<usize>) -> bool {
    let text = format!("{}\n\n{}\r\n{}", START, DATA, RESULT);
    let bytes = text.as_bytes();

    let mut whole = LineDecoder::new();
    let mut expected: Vec<Parsed> = whole.push(bytes).into_iter().map(Result::unwrap).collect();
    expected.extend(whole.finish().map(Result::unwrap));

    let mut offsets: Vec<usize> = cuts.iter().map(|c| c % (bytes.len() + 1)).collect();
    offsets.extend([0, bytes.len()]);
    offsets.sort_unstable();
    offsets.dedup();

    let mut decoder = LineDecoder::new();
    let mut actual = Vec::new();
    for w in offsets.windows(2) {
        actual.extend(decoder.push(&bytes[w[0]..w[1]]).into_iter().map(Result::unwrap));
    }
    actual.extend(decoder.finish().map(Result::unwrap));

    expected.len() == 3 && actual == expected
}
