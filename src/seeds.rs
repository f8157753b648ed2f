//! Built-in problem catalog used when no TOML catalog is configured.

use crate::domain::{CandidateProblem, Difficulty};

#[allow(clippy::too_many_arguments)]
fn p(
  title: &str,
  difficulty: Difficulty,
  company: &str,
  topics: &[&str],
  slug: &str,
  frequency: f64,
  acceptance: f64,
  originality: f64,
  likes: u64,
  dislikes: u64,
) -> CandidateProblem {
  CandidateProblem {
    title: title.into(),
    difficulty,
    topics: topics.iter().map(|t| t.to_string()).collect(),
    company: company.into(),
    link: format!("https://leetcode.com/problems/{slug}/"),
    frequency: Some(frequency),
    acceptance_rate: Some(acceptance),
    originality_score: Some(originality),
    likes: Some(likes),
    dislikes: Some(dislikes),
    total_votes: Some(likes + dislikes),
  }
}

/// Minimal catalog that keeps the service useful without external config.
pub fn seed_problems() -> Vec<CandidateProblem> {
  use Difficulty::*;
  vec![
    p("Two Sum", Easy, "Google", &["Array", "Hash Table"], "two-sum", 98.0, 0.52, 0.92, 56_000, 1_900),
    p("Valid Parentheses", Easy, "Amazon", &["String", "Stack"], "valid-parentheses", 88.0, 0.41, 0.95, 23_000, 1_600),
    p("Merge Two Sorted Lists", Easy, "Meta", &["Linked List", "Recursion"], "merge-two-sorted-lists", 75.0, 0.64, 0.95, 21_000, 2_000),
    p("Best Time to Buy and Sell Stock", Easy, "Amazon", &["Array", "Dynamic Programming"], "best-time-to-buy-and-sell-stock", 90.0, 0.54, 0.94, 31_000, 1_100),
    p("Valid Anagram", Easy, "Meta", &["String", "Hash Table", "Sorting"], "valid-anagram", 60.0, 0.64, 0.96, 12_000, 400),
    p("Climbing Stairs", Easy, "Google", &["Dynamic Programming", "Math"], "climbing-stairs", 70.0, 0.53, 0.96, 21_000, 750),
    p("Maximum Depth of Binary Tree", Easy, "Microsoft", &["Tree", "Depth-First Search"], "maximum-depth-of-binary-tree", 55.0, 0.75, 0.97, 13_000, 220),
    p("Longest Substring Without Repeating Characters", Medium, "Amazon", &["String", "Hash Table", "Sliding Window"], "longest-substring-without-repeating-characters", 95.0, 0.35, 0.95, 40_000, 1_900),
    p("Group Anagrams", Medium, "Meta", &["Array", "Hash Table", "String", "Sorting"], "group-anagrams", 80.0, 0.68, 0.97, 19_000, 600),
    p("Number of Islands", Medium, "Google", &["Array", "Graph", "Breadth-First Search"], "number-of-islands", 92.0, 0.59, 0.97, 23_000, 500),
    p("LRU Cache", Medium, "Microsoft", &["Hash Table", "Linked List", "Design"], "lru-cache", 89.0, 0.43, 0.91, 21_000, 1_000),
    p("Course Schedule", Medium, "Google", &["Graph", "Topological Sort"], "course-schedule", 78.0, 0.47, 0.97, 16_000, 700),
    p("Product of Array Except Self", Medium, "Meta", &["Array", "Prefix Sum"], "product-of-array-except-self", 85.0, 0.66, 0.95, 23_000, 1_400),
    p("Kth Largest Element in an Array", Medium, "Microsoft", &["Array", "Heap (Priority Queue)", "Sorting"], "kth-largest-element-in-an-array", 68.0, 0.67, 0.93, 17_000, 900),
    p("Coin Change", Medium, "Amazon", &["Array", "Dynamic Programming"], "coin-change", 72.0, 0.44, 0.97, 18_000, 430),
    p("Find Minimum in Rotated Sorted Array II", Hard, "Microsoft", &["Array", "Binary Search"], "find-minimum-in-rotated-sorted-array-ii", 20.0, 0.44, 0.88, 1_900, 220),
    p("Trapping Rain Water", Hard, "Google", &["Array", "Two Pointers", "Stack"], "trapping-rain-water", 91.0, 0.62, 0.98, 31_000, 500),
    p("Merge k Sorted Lists", Hard, "Amazon", &["Linked List", "Heap (Priority Queue)"], "merge-k-sorted-lists", 83.0, 0.53, 0.97, 19_000, 700),
    p("Median of Two Sorted Arrays", Hard, "Google", &["Array", "Binary Search"], "median-of-two-sorted-arrays", 86.0, 0.40, 0.90, 27_000, 3_000),
    p("Word Ladder", Hard, "Meta", &["Hash Table", "String", "Breadth-First Search"], "word-ladder", 65.0, 0.39, 0.88, 12_000, 1_700),
    p("Minimum Window Substring", Hard, "Meta", &["Hash Table", "String", "Sliding Window"], "minimum-window-substring", 77.0, 0.43, 0.96, 17_000, 700),
    p("Serialize and Deserialize Binary Tree", Hard, "Microsoft", &["Tree", "Design", "Breadth-First Search"], "serialize-and-deserialize-binary-tree", 62.0, 0.57, 0.95, 10_000, 380),
    p("Stone Game IX", Medium, "Amazon", &["Math", "Greedy", "Game Theory"], "stone-game-ix", 8.0, 0.29, 0.90, 260, 30),
    p("Count Subarrays With Fixed Bounds", Hard, "Amazon", &["Array", "Sliding Window", "Monotonic Queue"], "count-subarrays-with-fixed-bounds", 14.0, 0.68, 0.97, 1_500, 40),
  ]
}
