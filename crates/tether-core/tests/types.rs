//! Tests for shared value types

use tether_core::options::TraceOptions;
use tether_core::types::{Address, ProcessId, Word, WordWidth, WORD_SIZE};

#[test]
fn test_process_id_from_pid_t()
{
    let pid = ProcessId::from(12345);
    assert_eq!(pid.0, 12345);
    assert_eq!(pid.raw(), 12345);
}

#[test]
fn test_process_id_to_pid_t()
{
    let pid = ProcessId::from(54321);
    let value: libc::pid_t = pid.into();
    assert_eq!(value, 54321);
}

#[test]
fn test_process_id_equality_and_display()
{
    let pid1 = ProcessId::from(12345);
    let pid2 = ProcessId::from(12345);
    let pid3 = ProcessId::from(54321);

    assert_eq!(pid1, pid2);
    assert_ne!(pid1, pid3);
    assert_eq!(pid1.to_string(), "12345");
}

#[test]
fn test_process_id_from_child()
{
    let mut child = std::process::Command::new("true").spawn().unwrap();
    let pid = ProcessId::from(&child);
    assert_eq!(u32::try_from(pid.raw()).unwrap(), child.id());
    child.wait().unwrap();
}

#[test]
fn test_address_arithmetic()
{
    let addr = Address::from(0x1000);
    assert_eq!((addr + 0x10).value(), 0x1010);
    assert_eq!((addr - 0x10).value(), 0x0ff0);
    assert_eq!(Address::ZERO - 1, Address::new(Word::MAX));
    assert_eq!(Address::ZERO.checked_sub(1), None);
    assert_eq!(Address::new(Word::MAX).checked_add(1), None);
}

#[test]
fn test_address_alignment()
{
    let addr = Address::new(WORD_SIZE * 3 + 1);
    assert!(!addr.is_word_aligned());
    assert_eq!(addr.align_down_to_word(), Address::new(WORD_SIZE * 3));
    assert!(addr.align_down_to_word().is_word_aligned());
}

#[test]
fn test_address_display_is_zero_padded()
{
    let text = Address::new(0x1000).to_string();
    assert!(text.starts_with("0x"));
    assert!(text.ends_with("1000"));
    assert_eq!(text.len(), 2 + WORD_SIZE * 2);
}

#[test]
fn test_address_word_conversion()
{
    let word: Word = Address::new(0xdead).into();
    assert_eq!(word, 0xdead);
    assert_eq!(Address::default(), Address::ZERO);
}

#[test]
fn test_native_word_width()
{
    assert_eq!(WordWidth::NATIVE.bytes(), WORD_SIZE);
    assert_eq!(WordWidth::Bits64.to_string(), "64-bit");
    assert!(!WordWidth::Bits32.same_as(WordWidth::Bits64));
}

#[test]
fn test_trace_options_bits()
{
    assert_eq!(TraceOptions::empty().as_word(), 0);
    assert_eq!(TraceOptions::TRACEEXIT.bits(), 0x40);
    assert_eq!(TraceOptions::EXITKILL.bits(), 0x0010_0000);
    let options = TraceOptions::TRACEFORK | TraceOptions::TRACECLONE;
    assert!(options.contains(TraceOptions::TRACECLONE));
    assert!(!options.contains(TraceOptions::TRACEVFORK));
}
