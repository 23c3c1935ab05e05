use dynvec::{DynVec, DynVecError};

#[test]
fn test_documented_scenario() {
    let mut vec: DynVec<i32> = DynVec::new();
    assert_eq!(vec.pop_back(), Err(DynVecError::ContainerIsEmpty));

    vec.push_back(&5);
    vec.push_back(&7);
    assert_eq!(vec.at(0), Ok(&5));
    assert_eq!(vec.at(1), Ok(&7));
    assert_eq!(vec.len(), 2);

    vec.erase(0).unwrap();
    assert_eq!(vec.at(0), Ok(&7));
    assert_eq!(vec.len(), 1);

    vec.insert(0, &3).unwrap();
    assert_eq!(vec.at(0), Ok(&3));
    assert_eq!(vec.at(1), Ok(&7));

    let other: DynVec<i32> = DynVec::new();
    assert_eq!(
        vec.begin() - other.begin(),
        Err(DynVecError::InvalidIterator)
    );
}

#[test]
fn test_growth_preserves_order() {
    let mut vec = DynVec::new();
    for i in 0..1000usize {
        vec.push_back(&i);
    }

    assert_eq!(vec.len(), 1000);
    assert_eq!(vec.capacity(), 1024);
    for i in 0..1000 {
        assert_eq!(vec.at(i), Ok(&i));
    }
}

#[test]
fn test_len_tracks_pushes() {
    let mut vec = DynVec::new();
    assert!(vec.is_empty());

    for n in 1..=20 {
        vec.push_back(&n);
        assert_eq!(vec.len(), n);
        assert!(!vec.is_empty());
        assert!(vec.capacity() >= vec.len());
    }
}

#[test]
fn test_insert_then_at_yields_value() {
    let base: DynVec<i32> = (0..6).collect();

    for k in 0..=base.len() {
        let mut vec = base.clone();
        let pos = vec.begin_mut() + k as isize;
        vec.insert_at_cursor(pos, &-1).unwrap();

        assert_eq!(vec.len(), base.len() + 1);
        assert_eq!(vec.at(k), Ok(&-1));
        assert_eq!(&vec.as_slice()[..k], &base.as_slice()[..k]);
        assert_eq!(&vec.as_slice()[k + 1..], &base.as_slice()[k..]);
    }
}

#[test]
fn test_erase_shifts_following_elements() {
    let base: DynVec<String> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    for k in 0..base.len() {
        let mut vec = base.clone();
        let pos = vec.begin_mut() + k as isize;
        let next = vec.erase_at_cursor(pos).unwrap();

        assert_eq!(vec.len(), base.len() - 1);
        assert_eq!(&vec.as_slice()[..k], &base.as_slice()[..k]);
        assert_eq!(&vec.as_slice()[k..], &base.as_slice()[k + 1..]);
        if k == base.len() - 1 {
            assert!(next == vec.end());
        } else {
            assert_eq!(vec.get_at(next), Ok(&base[k + 1]));
        }
    }
}

#[test]
fn test_erase_keeps_capacity() {
    let mut vec: DynVec<u64> = (0..8).collect();
    assert_eq!(vec.capacity(), 8);

    while !vec.is_empty() {
        vec.erase(0).unwrap();
    }
    assert_eq!(vec.capacity(), 8);
}

#[test]
fn test_insert_at_end_appends() {
    let mut vec: DynVec<i32> = (0..3).collect();
    let cursor = vec.insert(3, &3).unwrap();
    assert_eq!(vec.as_slice(), &[0, 1, 2, 3]);
    assert_eq!(vec.get_at(cursor), Ok(&3));
}

#[test]
fn test_clone_is_deep_and_independent() {
    let mut original: DynVec<String> = DynVec::new();
    original.push_back(&"alpha".to_string());
    original.push_back(&"beta".to_string());

    let mut copy = original.clone();
    assert_eq!(copy, original);

    copy[0].push_str("-changed");
    copy.push_back(&"gamma".to_string());
    original.erase(1).unwrap();

    assert_eq!(original.as_slice(), &["alpha"]);
    assert_eq!(copy.as_slice(), &["alpha-changed", "beta", "gamma"]);
}

#[test]
fn test_clone_from_replaces_contents() {
    let source: DynVec<i32> = (10..15).collect();
    let mut target: DynVec<i32> = (0..2).collect();
    let owner = target.owner();

    target.clone_from(&source);
    assert_eq!(target, source);
    assert_eq!(target.owner(), owner);

    target.push_back(&99);
    assert_eq!(source.len(), 5);
}

#[test]
fn test_swap_exchanges_contents() {
    let mut a: DynVec<i32> = (0..3).collect();
    let mut b: DynVec<i32> = DynVec::new();
    let capacity = a.capacity();

    a.swap(&mut b);
    assert!(a.is_empty());
    assert_eq!(a.capacity(), 0);
    assert_eq!(b.as_slice(), &[0, 1, 2]);
    assert_eq!(b.capacity(), capacity);
}

#[test]
fn test_front_back_and_mut_access() {
    let mut vec: DynVec<i32> = (1..=4).collect();
    assert_eq!(vec.front(), Ok(&1));
    assert_eq!(vec.back(), Ok(&4));

    *vec.front_mut().unwrap() = 100;
    *vec.back_mut().unwrap() = 400;
    *vec.at_mut(1).unwrap() += 20;
    vec[2] *= 10;

    assert_eq!(vec.as_slice(), &[100, 22, 30, 400]);
    assert_eq!(vec.get(3), Some(&400));
    assert_eq!(vec.get(4), None);
}

#[test]
fn test_pop_back_returns_elements_in_reverse() {
    let mut vec: DynVec<char> = "abc".chars().collect();
    assert_eq!(vec.pop_back(), Ok('c'));
    assert_eq!(vec.pop_back(), Ok('b'));
    assert_eq!(vec.pop_back(), Ok('a'));
    assert_eq!(vec.pop_back(), Err(DynVecError::ContainerIsEmpty));
    assert!(vec.capacity() >= 3);
}

#[test]
fn test_clear_then_reuse() {
    let mut vec: DynVec<String> = DynVec::new();
    for word in ["one", "two", "three"] {
        vec.push_back(&word.to_string());
    }
    let capacity = vec.capacity();

    vec.clear();
    assert!(vec.is_empty());
    assert_eq!(vec.capacity(), capacity);

    vec.push_back(&"four".to_string());
    assert_eq!(vec.as_slice(), &["four"]);
}

#[test]
fn test_reserve_and_shrink_to_fit() {
    let mut vec: DynVec<u8> = DynVec::with_capacity(2);
    assert_eq!(vec.capacity(), 2);

    vec.extend(&[1, 2, 3]);
    assert_eq!(vec.capacity(), 4);

    vec.reserve(10);
    assert_eq!(vec.capacity(), 13);
    assert_eq!(vec.as_slice(), &[1, 2, 3]);

    vec.reserve(1);
    assert_eq!(vec.capacity(), 13);

    vec.shrink_to_fit();
    assert_eq!(vec.capacity(), 3);
    assert_eq!(vec.as_slice(), &[1, 2, 3]);
}

#[test]
fn test_conversions_and_debug() {
    let items = [3u16, 1, 4, 1, 5];
    let vec = DynVec::from(&items[..]);
    assert_eq!(vec.capacity(), 5);
    assert!(vec == items[..]);
    assert_eq!(format!("{vec:?}"), "[3, 1, 4, 1, 5]");

    let default: DynVec<u16> = DynVec::default();
    assert_eq!(format!("{default:?}"), "[]");
}
