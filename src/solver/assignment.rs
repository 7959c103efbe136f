/// Minimum cost perfect matching of rows to columns (Hungarian algorithm with potentials).
///
/// `costs` must be square. Returns the total cost and for each row its column.
pub(crate) fn min_cost_assignment(costs: &[Vec<u32>]) -> (u64, Vec<usize>) {
    let n = costs.len();
    if n == 0 {
        return (0, Vec::new());
    }
    debug_assert!(costs.iter().all(|row| row.len() == n));

    // 1-based, index 0 is a sentinel column
    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; n + 1];
    let mut row_of_col = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        row_of_col[0] = row;
        let mut col0 = 0;
        let mut min_v = vec![i64::max_value(); n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[col0] = true;
            let row0 = row_of_col[col0];
            let mut delta = i64::max_value();
            let mut col1 = 0;
            for col in 1..=n {
                if used[col] {
                    continue;
                }
                let cur = i64::from(costs[row0 - 1][col - 1]) - u[row0] - v[col];
                if cur < min_v[col] {
                    min_v[col] = cur;
                    way[col] = col0;
                }
                if min_v[col] < delta {
                    delta = min_v[col];
                    col1 = col;
                }
            }
            for col in 0..=n {
                if used[col] {
                    u[row_of_col[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_v[col] -= delta;
                }
            }
            col0 = col1;
            if row_of_col[col0] == 0 {
                break;
            }
        }

        // flip the augmenting path
        loop {
            let col1 = way[col0];
            row_of_col[col0] = row_of_col[col1];
            col0 = col1;
            if col0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0; n];
    for col in 1..=n {
        assignment[row_of_col[col] - 1] = col - 1;
    }
    let total = assignment
        .iter()
        .enumerate()
        .map(|(row, &col)| u64::from(costs[row][col]))
        .sum();
    (total, assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(costs: &[Vec<u32>]) -> u64 {
        fn go(costs: &[Vec<u32>], row: usize, used: &mut Vec<bool>) -> u64 {
            if row == costs.len() {
                return 0;
            }
            let mut best = u64::max_value();
            for col in 0..costs.len() {
                if !used[col] {
                    used[col] = true;
                    best = best.min(u64::from(costs[row][col]) + go(costs, row + 1, used));
                    used[col] = false;
                }
            }
            best
        }
        go(costs, 0, &mut vec![false; costs.len()])
    }

    #[test]
    fn empty() {
        assert_eq!(min_cost_assignment(&[]), (0, vec![]));
    }

    #[test]
    fn greedy_is_not_enough() {
        // taking the cheapest cell first (0, 0) forces the expensive (1, 1)
        let costs = vec![vec![1, 2], vec![2, 100]];
        assert_eq!(min_cost_assignment(&costs), (4, vec![1, 0]));
    }

    #[test]
    fn matches_brute_force() {
        let costs = vec![
            vec![7, 53, 183, 439, 863],
            vec![497, 383, 563, 79, 973],
            vec![287, 63, 343, 169, 583],
            vec![627, 343, 773, 959, 943],
            vec![767, 473, 103, 699, 303],
        ];
        let (total, assignment) = min_cost_assignment(&costs);
        assert_eq!(total, brute_force(&costs));

        let mut cols = assignment.clone();
        cols.sort();
        assert_eq!(cols, vec![0, 1, 2, 3, 4]);

        // pseudo random matrices with repeated values
        let mut seed = 12345u32;
        for n in 1..7 {
            let costs: Vec<Vec<u32>> = (0..n)
                .map(|_| {
                    (0..n)
                        .map(|_| {
                            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
                            (seed >> 16) % 20
                        })
                        .collect()
                })
                .collect();
            assert_eq!(min_cost_assignment(&costs).0, brute_force(&costs));
        }
    }
}
