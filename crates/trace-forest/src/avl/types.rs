/// AVL tree node.
///
/// Children are plain `Option` handles; there is no parent link and no
/// sentinel. `h` is the number of nodes on the longest path down to a leaf,
/// so a fresh leaf has height 1.
#[derive(Clone, Debug)]
pub struct AvlNode<V> {
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub v: V,
    pub h: u32,
}

impl<V> AvlNode<V> {
    pub fn new(v: V) -> Self {
        Self {
            l: None,
            r: None,
            v,
            h: 1,
        }
    }
}
