//! 段落重排规划
//!
//! 纯函数：给定章节内按 order 升序排列的段落槽位和移动方向，
//! 算出需要交换 order 值的两个段落。只交换两个值，其余段落不动。

use super::book::{BookError, MoveDirection, ParagraphId};

/// 段落在章节中的顺序槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSlot {
    pub paragraph_id: ParagraphId,
    pub order: i64,
}

impl OrderSlot {
    pub fn new(paragraph_id: ParagraphId, order: i64) -> Self {
        Self {
            paragraph_id,
            order,
        }
    }
}

/// 移动计划
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePlan {
    /// 已在边界（首段上移、末段下移），不做任何修改
    Stay,
    /// 交换 moving 和 neighbour 的 order 值
    Swap {
        moving: OrderSlot,
        neighbour: OrderSlot,
    },
}

impl MovePlan {
    pub fn is_noop(&self) -> bool {
        matches!(self, MovePlan::Stay)
    }

    /// 交换完成后两个段落的新槽位
    pub fn swapped(&self) -> Option<(OrderSlot, OrderSlot)> {
        match self {
            MovePlan::Stay => None,
            MovePlan::Swap { moving, neighbour } => Some((
                OrderSlot::new(moving.paragraph_id, neighbour.order),
                OrderSlot::new(neighbour.paragraph_id, moving.order),
            )),
        }
    }
}

/// 计算移动计划
///
/// `ordered` 必须按 order 升序。段落不在列表中时返回 `InconsistentState`。
pub fn plan_move(
    ordered: &[OrderSlot],
    paragraph_id: ParagraphId,
    direction: MoveDirection,
) -> Result<MovePlan, BookError> {
    let index = ordered
        .iter()
        .position(|slot| slot.paragraph_id == paragraph_id)
        .ok_or_else(|| {
            BookError::InconsistentState(format!("段落 {} 不在所属章节的顺序列表中", paragraph_id))
        })?;

    let target = match direction {
        MoveDirection::Up if index > 0 => index - 1,
        MoveDirection::Down if index + 1 < ordered.len() => index + 1,
        _ => return Ok(MovePlan::Stay),
    };

    Ok(MovePlan::Swap {
        moving: ordered[index],
        neighbour: ordered[target],
    })
}

/// 检查槽位是否严格递增（order 两两不同）
pub fn is_strictly_increasing(ordered: &[OrderSlot]) -> bool {
    ordered.windows(2).all(|pair| pair[0].order < pair[1].order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(orders: &[(i64, i64)]) -> Vec<OrderSlot> {
        orders
            .iter()
            .map(|(id, order)| OrderSlot::new(ParagraphId::new(*id), *order))
            .collect()
    }

    /// 把计划应用到槽位列表上并重新排序，模拟存储层的交换
    fn apply(ordered: &[OrderSlot], plan: MovePlan) -> Vec<OrderSlot> {
        let mut result = ordered.to_vec();
        if let Some((a, b)) = plan.swapped() {
            for slot in result.iter_mut() {
                if slot.paragraph_id == a.paragraph_id {
                    slot.order = a.order;
                } else if slot.paragraph_id == b.paragraph_id {
                    slot.order = b.order;
                }
            }
        }
        result.sort_by_key(|s| s.order);
        result
    }

    fn ids(ordered: &[OrderSlot]) -> Vec<i64> {
        ordered.iter().map(|s| s.paragraph_id.value()).collect()
    }

    #[test]
    fn test_first_up_is_noop() {
        let list = slots(&[(1, 0), (2, 1), (3, 2)]);
        let plan = plan_move(&list, ParagraphId::new(1), MoveDirection::Up).unwrap();
        assert_eq!(plan, MovePlan::Stay);
    }

    #[test]
    fn test_last_down_is_noop() {
        let list = slots(&[(1, 0), (2, 1), (3, 2)]);
        let plan = plan_move(&list, ParagraphId::new(3), MoveDirection::Down).unwrap();
        assert!(plan.is_noop());
    }

    #[test]
    fn test_single_paragraph_never_moves() {
        let list = slots(&[(7, 0)]);
        assert!(plan_move(&list, ParagraphId::new(7), MoveDirection::Up).unwrap().is_noop());
        assert!(plan_move(&list, ParagraphId::new(7), MoveDirection::Down).unwrap().is_noop());
    }

    #[test]
    fn test_swap_exchanges_order_values_only() {
        // 顺序值不连续也应正常工作
        let list = slots(&[(1, 0), (2, 5), (3, 9), (4, 12)]);
        let plan = plan_move(&list, ParagraphId::new(3), MoveDirection::Up).unwrap();

        assert_eq!(
            plan,
            MovePlan::Swap {
                moving: OrderSlot::new(ParagraphId::new(3), 9),
                neighbour: OrderSlot::new(ParagraphId::new(2), 5),
            }
        );

        let after = apply(&list, plan);
        assert_eq!(ids(&after), vec![1, 3, 2, 4]);
        assert_eq!(after[0].order, 0);
        assert_eq!(after[3].order, 12);
        assert!(is_strictly_increasing(&after));
    }

    #[test]
    fn test_up_then_down_restores_order() {
        let list = slots(&[(1, 0), (2, 1), (3, 2), (4, 3)]);
        let up = plan_move(&list, ParagraphId::new(3), MoveDirection::Up).unwrap();
        let moved = apply(&list, up);
        let down = plan_move(&moved, ParagraphId::new(3), MoveDirection::Down).unwrap();
        let restored = apply(&moved, down);
        assert_eq!(restored, list);
    }

    #[test]
    fn test_missing_paragraph_is_inconsistent() {
        let list = slots(&[(1, 0), (2, 1)]);
        let result = plan_move(&list, ParagraphId::new(42), MoveDirection::Down);
        assert!(matches!(result, Err(BookError::InconsistentState(_))));
    }

    #[test]
    fn test_strictly_increasing_detects_duplicates() {
        assert!(is_strictly_increasing(&slots(&[(1, 0), (2, 3)])));
        assert!(!is_strictly_increasing(&slots(&[(1, 1), (2, 1)])));
        assert!(is_strictly_increasing(&[]));
    }
}
