use proptest::prelude::*;
use std::collections::VecDeque;
use strand::*;

#[derive(Debug, Clone)]
enum ListOp {
    InsertHead(u8),
    InsertTail(u8),
    InsertAt(usize, u8),
    InsertAfter(u8, u8),
    Extract(usize),
    ExtractId(u8),
    RemoveHead,
    RemoveTail,
    Move(usize, usize, bool),
    Reset,
}

#[derive(Debug, Clone)]
enum DequeOp {
    Append(u8),
    Prepend(u8),
    PopHead,
    PopTail,
}

fn list_op() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        any::<u8>().prop_map(ListOp::InsertHead),
        any::<u8>().prop_map(ListOp::InsertTail),
        (0..12usize, any::<u8>()).prop_map(|(i, v)| ListOp::InsertAt(i, v)),
        (any::<u8>(), any::<u8>()).prop_map(|(t, v)| ListOp::InsertAfter(t, v)),
        (0..12usize).prop_map(ListOp::Extract),
        any::<u8>().prop_map(ListOp::ExtractId),
        Just(ListOp::RemoveHead),
        Just(ListOp::RemoveTail),
        (0..12usize, 0..12usize, any::<bool>()).prop_map(|(f, t, b)| ListOp::Move(f, t, b)),
        Just(ListOp::Reset),
    ]
}

fn id(v: u8) -> String {
    format!("n{v}")
}

/// Extracts the node at `pick` by id and re-inserts it at the reported index;
/// the order must come back unchanged.
fn assert_round_trip<S: LinkScheme>(list: &mut LinkedList<u8, S>, pick: usize) {
    if list.is_empty() {
        return;
    }
    let before: Vec<String> = list.ids().map(str::to_owned).collect();
    let target = before[pick % before.len()].clone();
    let extracted = list.extract(target.as_str()).unwrap();
    assert_eq!(extracted.detail.id, target);
    list.insert_at(extracted.index, extracted.detail).unwrap();
    assert_eq!(list.ids().collect::<Vec<_>>(), before);
    list.check_invariants().unwrap();
}

/// Applies `ops` to `list` and to a `VecDeque` model, comparing after every step.
fn run_list<S: LinkScheme>(mut list: LinkedList<u8, S>, ops: Vec<ListOp>) {
    let mut model: VecDeque<u8> = VecDeque::new();
    for (step, op) in ops.into_iter().enumerate() {
        match op {
            ListOp::InsertHead(v) => {
                let res = list.insert_head((id(v), v));
                if model.contains(&v) {
                    assert_eq!(res.unwrap_err().kind(), ErrorKind::DuplicateId);
                } else {
                    res.unwrap();
                    model.push_front(v);
                }
            }
            ListOp::InsertTail(v) => {
                if list.insert_tail((id(v), v)).is_ok() {
                    model.push_back(v);
                }
            }
            ListOp::InsertAt(i, v) => {
                if list.insert_at(i, (id(v), v)).is_ok() {
                    model.insert(i.min(model.len()), v);
                }
            }
            ListOp::InsertAfter(t, v) => {
                let res = list.insert_after((id(v), v), id(t));
                match model.iter().position(|&x| x == t) {
                    None => assert_eq!(res.unwrap_err().kind(), ErrorKind::TargetNotFound),
                    Some(_) if model.contains(&v) => assert_eq!(res.unwrap_err().kind(), ErrorKind::DuplicateId),
                    Some(pos) => {
                        res.unwrap();
                        model.insert(pos + 1, v);
                    }
                }
            }
            ListOp::Extract(i) => {
                let got = list.extract(i).map(|e| (e.index, e.detail.data));
                assert_eq!(got, model.remove(i).map(|v| (i, v)));
            }
            ListOp::ExtractId(v) => {
                let got = list.extract(id(v)).map(|e| (e.index, e.detail.data));
                let expected = model.iter().position(|&x| x == v).and_then(|p| model.remove(p).map(|x| (p, x)));
                assert_eq!(got, expected);
            }
            ListOp::RemoveHead => match model.pop_front() {
                Some(v) => assert_eq!(list.remove_head().unwrap().data, v),
                None => assert_eq!(list.remove_head().unwrap_err().kind(), ErrorKind::Underflow),
            },
            ListOp::RemoveTail => match model.pop_back() {
                Some(v) => assert_eq!(list.remove_tail().unwrap().data, v),
                None => assert_eq!(list.remove_tail().unwrap_err().kind(), ErrorKind::Underflow),
            },
            ListOp::Move(from, to, after) => {
                let position = if after { Position::After } else { Position::Before };
                let res = list.move_node(from, to, position);
                if from >= model.len() || to >= model.len() {
                    assert_eq!(res.unwrap_err().kind(), ErrorKind::TargetNotFound);
                } else {
                    res.unwrap();
                    if from != to {
                        let dest = model[to];
                        let v = model.remove(from).unwrap();
                        let pos = model.iter().position(|&x| x == dest).unwrap();
                        model.insert(if after { pos + 1 } else { pos }, v);
                    }
                }
            }
            ListOp::Reset => {
                list.reset();
                model.clear();
            }
        }
        list.check_invariants().unwrap();
        assert_eq!(list.len(), model.len());
        assert_eq!(list.to_vec(), model.iter().copied().collect::<Vec<_>>());
        assert_eq!(list.head().map(|n| *n.data()), model.front().copied());
        assert_eq!(list.tail().map(|n| *n.data()), model.back().copied());
        assert_round_trip(&mut list, step);
    }
}

proptest! {
    #[test]
    fn test_singly_linear_matches_model(ops in proptest::collection::vec(list_op(), 1..80)) {
        run_list(SinglyLinkedList::linear(), ops);
    }

    #[test]
    fn test_singly_circular_matches_model(ops in proptest::collection::vec(list_op(), 1..80)) {
        run_list(SinglyLinkedList::circular(), ops);
    }

    #[test]
    fn test_doubly_linear_matches_model(ops in proptest::collection::vec(list_op(), 1..80)) {
        run_list(DoublyLinkedList::linear(), ops);
    }

    #[test]
    fn test_doubly_circular_matches_model(ops in proptest::collection::vec(list_op(), 1..80)) {
        run_list(DoublyLinkedList::circular(), ops);
    }

    #[test]
    fn test_extract_then_insert_at_restores_order(
        values in proptest::collection::hash_set(any::<u8>(), 1..30),
        pick in any::<usize>(),
    ) {
        let details = || values.iter().map(|&v| (id(v), v));
        for topology in [Topology::Linear, Topology::Circular] {
            assert_round_trip(&mut SinglyLinkedList::try_from_details(topology, details()).unwrap(), pick);
            assert_round_trip(&mut DoublyLinkedList::try_from_details(topology, details()).unwrap(), pick);
        }
    }

    #[test]
    fn test_doubly_backward_is_reverse(values in proptest::collection::hash_set(any::<u8>(), 0..40), circular in any::<bool>()) {
        let topology = if circular { Topology::Circular } else { Topology::Linear };
        let list = DoublyLinkedList::try_from_details(topology, values.iter().map(|&v| (id(v), v))).unwrap();
        let mut forward: Vec<_> = list.iter().map(|e| *e.data()).collect();
        let backward: Vec<_> = list.traverse_backward().map(|e| *e.data()).collect();
        forward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn test_bounded_list_never_exceeds_max(max in 0..8usize, ops in proptest::collection::vec(list_op(), 1..60)) {
        let mut list = DoublyLinkedList::with_max_size(Topology::Circular, max);
        for op in ops {
            let res = match op {
                ListOp::InsertHead(v) => list.insert_head((id(v), v)).map(|_| ()),
                ListOp::InsertTail(v) | ListOp::InsertAt(_, v) => list.insert_tail((id(v), v)).map(|_| ()),
                ListOp::RemoveHead | ListOp::Extract(_) => list.remove_head().map(|_| ()),
                _ => Ok(()),
            };
            if let Err(err) = res {
                prop_assert!(matches!(err.kind(), ErrorKind::Capacity | ErrorKind::DuplicateId | ErrorKind::Underflow));
            }
            prop_assert!(list.len() <= max);
            prop_assert!(list.check_invariants().is_ok());
        }
    }

    #[test]
    fn test_deque_matches_model(
        ops in proptest::collection::vec(
            prop_oneof![
                any::<u8>().prop_map(DequeOp::Append),
                any::<u8>().prop_map(DequeOp::Prepend),
                Just(DequeOp::PopHead),
                Just(DequeOp::PopTail),
            ],
            1..100,
        ),
        circular in any::<bool>(),
    ) {
        let topology = if circular { Topology::Circular } else { Topology::Linear };
        let mut deque = Deque::new(topology);
        let mut model: VecDeque<u8> = VecDeque::new();
        for op in ops {
            match op {
                DequeOp::Append(v) => {
                    if deque.append((id(v), v)).is_ok() {
                        model.push_back(v);
                    }
                }
                DequeOp::Prepend(v) => {
                    if deque.prepend((id(v), v)).is_ok() {
                        model.push_front(v);
                    }
                }
                DequeOp::PopHead => prop_assert_eq!(deque.pop_head().map(|d| d.data), model.pop_front()),
                DequeOp::PopTail => prop_assert_eq!(deque.pop_tail().map(|d| d.data), model.pop_back()),
            }
            prop_assert!(deque.check_invariants().is_ok());
            prop_assert_eq!(deque.len(), model.len());
            let values: Vec<_> = deque.iter().map(|e| *e.data()).collect();
            prop_assert_eq!(values, model.iter().copied().collect::<Vec<_>>());
        }
    }
}
