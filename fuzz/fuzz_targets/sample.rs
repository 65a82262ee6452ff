#![no_main]
use arrayref::array_ref;
use libfuzzer_sys::fuzz_target;
use pubid::{band, AlphabetType, CycleWalker, Permutation};

fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }
    let length = u32::from(data[0] % 12) + 1;
    let raw = u64::from_le_bytes(*array_ref!(data, 1, 8));
    let key = &data[9..];

    let lower = AlphabetType::Lower.alphabet();
    let range = band::size_band(length, lower.base()).unwrap();
    let bits = band::size_domain(range.capacity, band::DEFAULT_DOMAIN_FLOOR).unwrap();
    let capacity = range.capacity as u64;

    let walker = CycleWalker::new(Permutation::new(key, bits), capacity).unwrap();
    let index = walker.sample(raw % capacity).unwrap();
    assert!(index < capacity);

    let id = lower.encode(range.min_idx as u64 + index, length).unwrap();
    assert_eq!(id.chars().count(), length as usize);
});
