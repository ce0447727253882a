use ::quickcheck::{Arbitrary, Gen};
use compare::Compare;
use crate::{AbTree, Balance, BinaryTree};

impl<K, V, B, C> Arbitrary for BinaryTree<K, V, B, C>
    where K: Arbitrary, V: Arbitrary, B: 'static + Balance, C: 'static + Clone + Compare<K> + Default {

    fn arbitrary(gen: &mut Gen) -> Self {
        Vec::<(K, V)>::arbitrary(gen).into_iter().collect()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item=Self>> {
        let vec: Vec<(K, V)> = self.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        Box::new(vec.shrink().map(|vec| vec.into_iter().collect()))
    }
}

impl<K, V, C> Arbitrary for AbTree<K, V, C>
    where K: Arbitrary, V: Arbitrary, C: 'static + Clone + Compare<K> + Default {

    fn arbitrary(gen: &mut Gen) -> Self {
        Vec::<(K, V)>::arbitrary(gen).into_iter().collect()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item=Self>> {
        let vec: Vec<(K, V)> = self.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        Box::new(vec.shrink().map(|vec| vec.into_iter().collect()))
    }
}
