/// Calls `visit` with every `k`-element subset of `0..n`, as ascending index
/// slices in lexicographic order.
pub(crate) fn for_each_combination(n: usize, k: usize, mut visit: impl FnMut(&[usize])) {
    if k == 0 || k > n {
        return;
    }
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        visit(&indices);

        let mut pos = k;
        while pos > 0 && indices[pos - 1] == n - k + pos - 1 {
            pos -= 1;
        }
        if pos == 0 {
            return;
        }
        indices[pos - 1] += 1;
        for j in pos..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_all_subsets_in_order() {
        let mut seen = Vec::new();
        for_each_combination(4, 2, |c| seen.push(c.to_vec()));
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    fn visits_nothing_for_impossible_sizes() {
        let mut count = 0;
        for_each_combination(3, 4, |_| count += 1);
        for_each_combination(3, 0, |_| count += 1);
        assert_eq!(count, 0);

        for_each_combination(3, 3, |_| count += 1);
        assert_eq!(count, 1);
    }
}
